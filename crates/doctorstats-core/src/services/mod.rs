//! Typed service facade
//!
//! One method = one HTTP call through the shared [`ApiClient`]; every method
//! unwraps the response body into a model from `doctorstats-types`.

mod analysis;
mod auth;
mod datasets;
mod reports;
mod users;
mod visualizations;

pub use analysis::AnalysisService;
pub use auth::{AuthService, LOGIN_FAILED_MESSAGE};
pub use datasets::{DatasetService, DEFAULT_UPLOAD_DESCRIPTION};
pub use reports::ReportService;
pub use users::UserService;
pub use visualizations::VisualizationService;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::session::SessionContext;
use serde::Deserialize;
use std::borrow::Cow;

/// Some endpoints answer `{ "success": .., "data": T }`, others a bare `T`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// Path-segment encoding for ids taken from user input
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// All services over one client and session
#[derive(Clone, Debug)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub datasets: DatasetService,
    pub analysis: AnalysisService,
    pub reports: ReportService,
    pub visualizations: VisualizationService,
    client: ApiClient,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            users: UserService::new(client.clone()),
            datasets: DatasetService::new(client.clone()),
            analysis: AnalysisService::new(client.clone()),
            reports: ReportService::new(client.clone()),
            visualizations: VisualizationService::new(client.clone()),
            client,
        }
    }

    /// Build the client from config and wire every service to it
    pub fn connect(config: ClientConfig, session: SessionContext) -> Result<Self, ClientError> {
        Ok(Self::new(ApiClient::new(config, session)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Envelope<u32> = serde_json::from_str(r#"{"success": true, "data": 5}"#).unwrap();
        assert_eq!(wrapped.into_inner(), 5);
        let bare: Envelope<u32> = serde_json::from_str("7").unwrap();
        assert_eq!(bare.into_inner(), 7);
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("3f2a-uuid_1"), "3f2a-uuid_1");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("an?id#1"), "an%3Fid%231");
    }
}
