//! Shared plumbing for the subcommands: error rendering, the app context
//! and the route guard every page passes through.

use anyhow::{Context, Result};
use doctorstats_core::error::SESSION_EXPIRED_MESSAGE;
use doctorstats_core::types::UserProfile;
use doctorstats_core::{
    guard, ClientConfig, ClientError, FileTokenStore, GuardDecision, Route, Services,
    SessionContext, SessionEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    /// Inline alert of the active page
    Alert {
        message: String,
        suggestion: Option<&'static str>,
    },
    /// Protected page requested without a session; `expired` when the stored
    /// token was just rejected by the server
    LoginRequired { route: Route, expired: bool },
}

impl CliError {
    /// Alert for a failed call, using the page's fallback when the server gave no detail
    pub fn from_client(err: &ClientError, fallback: &str) -> Self {
        CliError::Alert {
            message: err.alert_message(fallback),
            suggestion: err.suggestion(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        CliError::Alert {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Alert { suggestion, .. } => *suggestion,
            CliError::LoginRequired { .. } => Some("Run 'doctorstats login' first"),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Alert { message, .. } => write!(f, "{}", message),
            CliError::LoginRequired { expired: true, .. } => {
                write!(f, "{}", SESSION_EXPIRED_MESSAGE)
            }
            CliError::LoginRequired { route, .. } => {
                write!(f, "Please log in to view {}", route.to_path())
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Turn a `ClientError` into the page alert, with the page's generic fallback
pub trait AlertExt<T> {
    fn alert(self, fallback: &str) -> Result<T, CliError>;
}

impl<T> AlertExt<T> for Result<T, ClientError> {
    fn alert(self, fallback: &str) -> Result<T, CliError> {
        self.map_err(|err| {
            tracing::debug!(error = ?err, "request failed");
            CliError::from_client(&err, fallback)
        })
    }
}

/// `Error: <message>` plus an optional hint line
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CliError>() {
        Some(cli_err) => match cli_err.suggestion() {
            Some(hint) => format!("Error: {}\n  {}", cli_err, hint),
            None => format!("Error: {}", cli_err),
        },
        None => format!("Error: {:#}", err),
    }
}

// ============================================================================
// App context
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub no_color: bool,
}

/// What the guard let through
#[derive(Debug)]
pub enum Entry {
    Render,
    /// Login/register requested while a session is already active
    AlreadyAuthenticated(Option<UserProfile>),
}

pub struct App {
    pub services: Services,
    pub output: Output,
}

impl App {
    /// Session backed by the token file under the configured data directory
    pub fn open(config: ClientConfig, output: Output) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(&config.data_dir));
        let session = SessionContext::new(store);
        let services = Services::connect(config, session).context("Invalid client configuration")?;
        Ok(Self { services, output })
    }

    pub fn session(&self) -> &SessionContext {
        self.services.session()
    }

    /// Restore the persisted session, then apply the route guard
    pub async fn enter(&self, route: Route) -> Result<Entry, CliError> {
        let needs_session = route.requires_auth() || route.redirects_when_authenticated();
        let mut events = self.session().events().subscribe();
        if needs_session && self.session().store().get().is_some() {
            let spinner = self.spinner("Checking session...");
            let restored = self.services.auth.bootstrap().await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            if let Err(err) = restored {
                // The token is kept; the page request below reports the failure
                tracing::warn!(error = %err, "could not verify stored session");
            }
        }

        match guard(route, &self.session().snapshot()) {
            GuardDecision::Render(_) => Ok(Entry::Render),
            GuardDecision::Redirect(Route::Login) => Err(CliError::LoginRequired {
                route,
                expired: redirected_to_login(&mut events),
            }),
            GuardDecision::Redirect(_) => Ok(Entry::AlreadyAuthenticated(self.session().user())),
            GuardDecision::Loading => Err(CliError::message("Session check did not finish")),
        }
    }

    /// Spinner on stderr, suppressed for JSON output
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.output.json {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    }

    /// Print a JSON value or fall through to human output
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<bool> {
        if !self.output.json {
            return Ok(false);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to serialize output")?
        );
        Ok(true)
    }
}

/// Drain pending session events; true if the session layer sent us to login
fn redirected_to_login(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut redirected = false;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Navigate(Route::Login)) => redirected = true,
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    redirected
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_uses_fallback_without_detail() {
        let err: Result<(), ClientError> = Err(ClientError::Server {
            status: 500,
            detail: None,
        });
        let cli_err = err.alert("Failed to load datasets").unwrap_err();
        assert_eq!(cli_err.to_string(), "Failed to load datasets");
        assert!(cli_err.suggestion().is_none());
    }

    #[test]
    fn test_render_error_with_hint() {
        let err = anyhow::Error::new(CliError::LoginRequired {
            route: Route::Dashboard,
            expired: false,
        });
        let rendered = render_error(&err);
        assert!(rendered.starts_with("Error: Please log in to view /dashboard"));
        assert!(rendered.contains("doctorstats login"));
    }

    #[test]
    fn test_render_error_plain_anyhow() {
        let err = anyhow::anyhow!("boom").context("Failed to read file");
        assert_eq!(render_error(&err), "Error: Failed to read file: boom");
    }

    #[tokio::test]
    async fn test_enter_protected_route_without_token() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ClientConfig::default()
            .with_api_url("http://127.0.0.1:9/api/v1")
            .with_data_dir(dir.path());
        let app = App::open(config, Output::default()).unwrap();

        let err = app.enter(Route::Analysis).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::LoginRequired {
                route: Route::Analysis,
                expired: false
            }
        ));
        assert!(matches!(app.enter(Route::Login).await, Ok(Entry::Render)));
    }

    #[test]
    fn test_rejected_token_reads_as_expired_session() {
        let bus = doctorstats_core::EventBus::new(8);
        let mut events = bus.subscribe();
        bus.publish(SessionEvent::LoggedOut {
            reason: doctorstats_core::event::LogoutReason::Unauthorized,
        });
        bus.publish(SessionEvent::Navigate(Route::Login));

        assert!(redirected_to_login(&mut events));
        assert!(!redirected_to_login(&mut events));

        let err = CliError::LoginRequired {
            route: Route::Reports,
            expired: true,
        };
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(err.suggestion(), Some("Run 'doctorstats login' first"));
    }
}
