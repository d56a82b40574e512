//! Session store
//!
//! `SessionState` changes only through the pure [`reduce`] function.
//! [`SessionContext`] is the injectable handle the HTTP client, the route
//! guard and the auth flows share: it applies actions under a write lock
//! (one state replacement per action), persists the token, and publishes
//! [`SessionEvent`]s.

use crate::event::{EventBus, LogoutReason, SessionEvent};
use crate::route::Route;
use crate::storage::{MemoryTokenStore, TokenStore};
use doctorstats_types::UserProfile;
use parking_lot::RwLock;
use std::sync::Arc;

/// Client record of authentication
///
/// `user` is only meaningful while `token` is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// State transitions of the session store
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoginSucceeded { token: String, user: UserProfile },
    Logout,
    SetLoading(bool),
    SetError(String),
    /// Persisted token found at startup; the profile still has to be fetched
    TokenRestored(String),
    ProfileLoaded(UserProfile),
}

/// Coarse authentication phase derived from a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    Failed(String),
}

impl SessionState {
    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Authenticating
        } else if self.token.is_some() {
            AuthPhase::Authenticated
        } else if let Some(error) = &self.error {
            AuthPhase::Failed(error.clone())
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Pure reducer
pub fn reduce(state: &SessionState, action: &SessionAction) -> SessionState {
    let mut next = state.clone();
    match action {
        SessionAction::LoginSucceeded { token, user } => {
            next.token = Some(token.clone());
            next.user = Some(user.clone());
            next.is_loading = false;
            next.error = None;
        }
        SessionAction::Logout => {
            next.token = None;
            next.user = None;
            next.is_loading = false;
        }
        SessionAction::SetLoading(loading) => {
            next.is_loading = *loading;
        }
        SessionAction::SetError(message) => {
            next.error = Some(message.clone());
            next.is_loading = false;
        }
        SessionAction::TokenRestored(token) => {
            next.token = Some(token.clone());
            next.user = None;
            next.is_loading = true;
        }
        SessionAction::ProfileLoaded(user) => {
            if next.token.is_some() {
                next.user = Some(user.clone());
            }
            next.is_loading = false;
        }
    }
    next
}

struct SessionInner {
    state: RwLock<SessionState>,
    store: Arc<dyn TokenStore>,
    events: EventBus,
}

/// Shared, cheaply cloneable session handle
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    /// Create an empty (anonymous) session backed by `store`.
    ///
    /// The persisted token is not read until [`SessionContext::restore`].
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_events(store, EventBus::default())
    }

    pub fn with_events(store: Arc<dyn TokenStore>, events: EventBus) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                store,
                events,
            }),
        }
    }

    /// Session that persists nothing
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    /// Current token, read at call time
    pub fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().token.is_some()
    }

    pub fn phase(&self) -> AuthPhase {
        self.inner.state.read().phase()
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Apply an action: replace state, persist, publish
    pub fn dispatch(&self, action: SessionAction) {
        let next = {
            let mut state = self.inner.state.write();
            let next = reduce(&state, &action);
            *state = next.clone();
            next
        };

        match action {
            SessionAction::LoginSucceeded { token, user } => {
                if let Err(e) = self.inner.store.set(&token) {
                    tracing::warn!(error = %e, "failed to persist session token");
                }
                tracing::info!(email = %user.email, "logged in");
                self.inner.events.publish(SessionEvent::LoggedIn { email: user.email });
            }
            SessionAction::Logout => {
                self.remove_persisted();
                tracing::info!("logged out");
                self.inner.events.publish(SessionEvent::LoggedOut {
                    reason: LogoutReason::UserRequested,
                });
            }
            SessionAction::SetError(message) => {
                self.inner.events.publish(SessionEvent::AuthFailed(message));
            }
            SessionAction::TokenRestored(_) => {
                self.inner.events.publish(SessionEvent::BootstrapStarted);
            }
            SessionAction::ProfileLoaded(_) => {
                self.inner.events.publish(SessionEvent::BootstrapFinished {
                    authenticated: next.token.is_some(),
                });
            }
            SessionAction::SetLoading(_) => {}
        }
    }

    pub fn login(&self, token: String, user: UserProfile) {
        self.dispatch(SessionAction::LoginSucceeded { token, user });
    }

    /// Clear in-memory session and persisted token. Never calls the server.
    pub fn logout(&self) {
        self.dispatch(SessionAction::Logout);
    }

    /// Authorization-failure path: clear session, drop the persisted token,
    /// and send the front end to the login view.
    pub fn expire(&self) {
        {
            let mut state = self.inner.state.write();
            *state = reduce(&state, &SessionAction::Logout);
        }
        self.remove_persisted();
        tracing::info!("session expired; redirecting to login");
        self.inner.events.publish(SessionEvent::LoggedOut {
            reason: LogoutReason::Unauthorized,
        });
        self.inner
            .events
            .publish(SessionEvent::Navigate(Route::auth_failure_redirect()));
    }

    /// Start bootstrap from the persisted token.
    ///
    /// Returns the token when one was found; the state stays loading until
    /// [`SessionContext::finish_bootstrap`].
    pub fn restore(&self) -> Option<String> {
        let token = self.inner.store.get()?;
        self.dispatch(SessionAction::TokenRestored(token.clone()));
        Some(token)
    }

    /// Complete bootstrap with the re-fetched profile (if any)
    pub fn finish_bootstrap(&self, user: Option<UserProfile>) {
        match user {
            Some(user) => self.dispatch(SessionAction::ProfileLoaded(user)),
            None => {
                self.dispatch(SessionAction::SetLoading(false));
                self.inner.events.publish(SessionEvent::BootstrapFinished {
                    authenticated: self.is_authenticated(),
                });
            }
        }
    }

    fn remove_persisted(&self) {
        if let Err(e) = self.inner.store.remove() {
            tracing::warn!(error = %e, "failed to remove persisted session token");
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SessionContext")
            .field("authenticated", &state.token.is_some())
            .field("is_loading", &state.is_loading)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            organization: None,
            subscription_tier: "free".to_string(),
        }
    }

    #[test]
    fn test_reduce_login_then_logout() {
        let s0 = SessionState {
            error: Some("old".into()),
            is_loading: true,
            ..Default::default()
        };
        let s1 = reduce(
            &s0,
            &SessionAction::LoginSucceeded {
                token: "t".into(),
                user: user(),
            },
        );
        assert_eq!(s1.token.as_deref(), Some("t"));
        assert!(s1.error.is_none());
        assert!(!s1.is_loading);
        assert_eq!(s1.phase(), AuthPhase::Authenticated);

        let s2 = reduce(&s1, &SessionAction::Logout);
        assert!(s2.token.is_none());
        assert!(s2.user.is_none());
        assert_eq!(s2.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn test_reduce_error_clears_loading() {
        let loading = reduce(&SessionState::default(), &SessionAction::SetLoading(true));
        assert_eq!(loading.phase(), AuthPhase::Authenticating);
        let failed = reduce(&loading, &SessionAction::SetError("Incorrect email or password".into()));
        assert!(!failed.is_loading);
        assert_eq!(
            failed.phase(),
            AuthPhase::Failed("Incorrect email or password".into())
        );
    }

    #[test]
    fn test_profile_ignored_without_token() {
        let s = reduce(&SessionState::default(), &SessionAction::ProfileLoaded(user()));
        assert!(s.user.is_none());
    }

    #[test]
    fn test_context_persists_and_clears_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let ctx = SessionContext::new(store.clone());

        ctx.login("tok".into(), user());
        assert_eq!(store.get().as_deref(), Some("tok"));
        assert!(ctx.is_authenticated());

        ctx.logout();
        assert!(store.get().is_none());
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn test_expire_navigates_to_login() {
        let store = Arc::new(MemoryTokenStore::with_token("tok"));
        let ctx = SessionContext::new(store.clone());
        let mut rx = ctx.events().subscribe();
        ctx.restore();
        ctx.finish_bootstrap(Some(user()));

        ctx.expire();

        assert!(ctx.token().is_none());
        assert!(store.get().is_none());

        let mut saw_navigate = false;
        while let Ok(event) = rx.try_recv() {
            if event == SessionEvent::Navigate(Route::Login) {
                saw_navigate = true;
            }
        }
        assert!(saw_navigate);
    }

    #[test]
    fn test_restore_marks_loading_until_finished() {
        let ctx = SessionContext::new(Arc::new(MemoryTokenStore::with_token("persisted")));
        assert!(ctx.token().is_none());

        assert_eq!(ctx.restore().as_deref(), Some("persisted"));
        let state = ctx.snapshot();
        assert!(state.is_loading);
        assert!(state.user.is_none());

        ctx.finish_bootstrap(Some(user()));
        let state = ctx.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.user.unwrap().name, "Ada");
    }

    #[test]
    fn test_restore_without_token() {
        let ctx = SessionContext::in_memory();
        assert!(ctx.restore().is_none());
        assert_eq!(ctx.phase(), AuthPhase::Anonymous);
    }
}
