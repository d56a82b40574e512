//! Client configuration
//!
//! Values come from CLI flags or environment variables; anything unset falls
//! back to the defaults below.

use crate::error::ClientError;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8001/api/v1";

/// Fixed status polling interval for running analyses
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub const ENV_API_URL: &str = "DOCTORSTATS_API_URL";
pub const ENV_DATA_DIR: &str = "DOCTORSTATS_DATA_DIR";
pub const ENV_POLL_INTERVAL_MS: &str = "DOCTORSTATS_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "DOCTORSTATS_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (no trailing slash)
    pub api_url: String,
    /// Interval between status fetches while an analysis is pending/processing
    pub poll_interval: Duration,
    /// Per-request timeout; `None` leaves it to the transport
    pub request_timeout: Option<Duration>,
    /// Directory holding durable client state (the session token)
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Load from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(url);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup(ENV_POLL_INTERVAL_MS) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} (expected milliseconds)", ENV_POLL_INTERVAL_MS))?;
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} (expected seconds)", ENV_REQUEST_TIMEOUT_SECS))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig {
                message: format!("API URL must start with http:// or https:// (got '{}')", self.api_url),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ClientError::InvalidConfig {
                message: "Poll interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_url, path)
        } else {
            format!("{}/{}", self.api_url, path)
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("doctorstats"))
        .unwrap_or_else(|| PathBuf::from(".doctorstats"))
}
