//! Event bus for session changes using tokio::broadcast
//!
//! The session context publishes here; front ends subscribe to react to
//! logins, logouts and forced navigation (e.g. back to the login view).

use crate::route::Route;
use tokio::sync::broadcast;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit logout by the user
    UserRequested,
    /// The server rejected the token (HTTP 401)
    Unauthorized,
}

/// Events emitted by the session layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A login completed and the token was persisted
    LoggedIn { email: String },
    /// Session cleared and persisted token removed
    LoggedOut { reason: LogoutReason },
    /// The front end should show this route
    Navigate(Route),
    /// A persisted token was found and is being re-validated
    BootstrapStarted,
    /// Session bootstrap finished
    BootstrapFinished { authenticated: bool },
    /// An authentication attempt failed with this message
    AuthFailed(String),
}

/// Event bus for broadcasting session events
///
/// Uses tokio::broadcast so several views can listen at once.
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!(?event, "session event");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Get current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::LoggedOut {
            reason: LogoutReason::Unauthorized,
        });
        bus.publish(SessionEvent::Navigate(Route::Login));

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(
            event1,
            SessionEvent::LoggedOut {
                reason: LogoutReason::Unauthorized
            }
        ));

        let event2 = rx.recv().await.unwrap();
        assert_eq!(event2, SessionEvent::Navigate(Route::Login));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(SessionEvent::BootstrapStarted);

        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::BootstrapStarted);
        assert_eq!(rx2.recv().await.unwrap(), SessionEvent::BootstrapStarted);
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        // Should not panic even with no subscribers
        bus.publish(SessionEvent::AuthFailed("nope".to_string()));
    }
}
