//! Error types for doctorstats-core
//!
//! Four families reach the user: validation errors caught before any request,
//! authorization failures (which also end the session), server-reported errors
//! carrying the backend's `detail`, and transport failures.

use std::path::PathBuf;
use thiserror::Error;

/// Generic text shown when a network failure has no better description
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Generic text shown when an authorization failure carries no detail
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Client-side validation failure (no request was sent)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Form field the message refers to, if any
    pub field: Option<&'static str>,
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn for_field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }
}

/// Core error type for Doctor Stats client operations
#[derive(Error, Debug)]
pub enum ClientError {
    // ===================
    // Client-side
    // ===================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    // ===================
    // Authentication
    // ===================
    /// `status` is what the token endpoint answered (401, 400 or 422)
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { status: u16, message: String },

    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("session expired"))]
    Unauthorized { detail: Option<String> },

    // ===================
    // Server
    // ===================
    #[error("Server returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("Result not ready ({status}): {}", detail.as_deref().unwrap_or("still running"))]
    NotReady { status: u16, detail: Option<String> },

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Transport
    // ===================
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ===================
    // Storage
    // ===================
    #[error("Failed to access {path}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub fn network(source: reqwest::Error) -> Self {
        ClientError::Network {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// HTTP status attached to the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::InvalidCredentials { status, .. }
            | ClientError::Server { status, .. }
            | ClientError::NotReady { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided detail text
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { detail }
            | ClientError::Server { detail, .. }
            | ClientError::NotReady { detail, .. } => detail.as_deref(),
            ClientError::InvalidCredentials { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized { .. }
                | ClientError::InvalidCredentials { .. }
                | ClientError::NotAuthenticated
        )
    }

    /// Text for the inline alert of the active page.
    ///
    /// Server errors show the backend's `detail`, falling back to the page's
    /// generic message when the body has none.
    pub fn alert_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(e) => e.message.clone(),
            ClientError::InvalidCredentials { message, .. } => message.clone(),
            ClientError::Unauthorized { detail } => detail
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ClientError::NotAuthenticated => "Please log in to continue.".to_string(),
            ClientError::Server { detail, .. } | ClientError::NotReady { detail, .. } => {
                detail.clone().unwrap_or_else(|| fallback.to_string())
            }
            ClientError::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::InvalidConfig { message } => message.clone(),
            ClientError::Decode { .. } | ClientError::Storage { .. } => fallback.to_string(),
        }
    }

    /// Actionable hint for the user (optional)
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ClientError::Unauthorized { .. } | ClientError::NotAuthenticated => {
                Some("Run 'doctorstats login' to start a new session")
            }
            ClientError::Network { .. } => {
                Some("Check that the API is running and DOCTORSTATS_API_URL points at it")
            }
            ClientError::Storage { .. } => Some("Check permissions on DOCTORSTATS_DATA_DIR"),
            _ => None,
        }
    }
}
