//! Authenticated HTTP client
//!
//! One configured request pipeline for every service call:
//! - attaches `Authorization: Bearer <token>` when the session holds a token
//!   (read per request, never cached)
//! - sends multipart bodies untouched, with the transport's own boundary header
//! - on 401 expires the session (no retry) and returns `ClientError::Unauthorized`
//! - surfaces every other non-2xx as `ClientError::Server` with the backend `detail`

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionContext;
use reqwest::{multipart, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Request payload variants
pub enum RequestBody {
    Empty,
    /// Serialized with `Content-Type: application/json`
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Passed through as-is; the content type comes from the transport
    Multipart(multipart::Form),
}

impl RequestBody {
    pub fn json<T: Serialize>(body: &T) -> Result<Self, ClientError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|source| ClientError::Decode {
                what: "request body".to_string(),
                source,
            })
    }

    fn kind(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Json(_) => "json",
            RequestBody::Form(_) => "form",
            RequestBody::Multipart(_) => "multipart",
        }
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Successful (2xx) response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    what: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|source| ClientError::Decode {
            what: self.what.clone(),
            source,
        })
    }

    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::ACCEPTED.as_u16()
    }
}

/// HTTP client wrapper shared by all services
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: SessionContext) -> Result<Self, ClientError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("doctorstats/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::network)?;

        Ok(Self {
            http,
            config: Arc::new(config),
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Send a request with the session's current token
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ApiResponse, ClientError> {
        let token = self.session.token();
        self.execute(method, path, body, token.as_deref()).await
    }

    /// Send a request with an explicit token (used right after login, before
    /// the session holds it)
    pub async fn send_with_token(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        token: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(method, path, body, Some(token)).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.config.url(path);
        tracing::debug!(%method, %url, body = body.kind(), auth = token.is_some(), "request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(fields) => request.form(&fields),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "request failed");
                return Err(ClientError::network(e));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%method, %url, status = status.as_u16(), error = %e, "failed to read response body");
                return Err(ClientError::network(e));
            }
        };

        if status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                body: text,
                what: format!("{} {}", method, path),
            });
        }

        let detail = extract_detail(&text);
        tracing::warn!(%method, %url, status = status.as_u16(), body = %text, "request returned error status");

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(ClientError::Unauthorized { detail });
        }
        Err(ClientError::Server {
            status: status.as_u16(),
            detail,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(Method::GET, path, RequestBody::Empty).await?.json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, RequestBody::json(body)?)
            .await?
            .json()
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, RequestBody::json(body)?)
            .await?
            .json()
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> Result<T, ClientError> {
        self.send(Method::POST, path, RequestBody::Form(fields))
            .await?
            .json()
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ClientError> {
        self.send(Method::POST, path, RequestBody::Multipart(form))
            .await?
            .json()
    }

    /// DELETE; the response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, path, RequestBody::Empty).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.config.api_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Pull the user-facing message out of an error body.
///
/// Handles `{"detail": "..."}`, validation lists
/// `{"detail": [{"msg": "..."}, ...]}` and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("message"))?;
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail": "Incorrect email or password"}"#).as_deref(),
            Some("Incorrect email or password")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "username"], "msg": "field required"}, {"msg": "bad password"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; bad password")
        );
    }

    #[test]
    fn test_extract_detail_message_key_and_missing() {
        assert_eq!(
            extract_detail(r#"{"message": "Dataset too large"}"#).as_deref(),
            Some("Dataset too large")
        );
        assert!(extract_detail(r#"{"error": "x"}"#).is_none());
        assert!(extract_detail("<html>Bad Gateway</html>").is_none());
        assert!(extract_detail(r#"{"detail": ""}"#).is_none());
    }

    #[test]
    fn test_client_rejects_bad_config() {
        let config = ClientConfig::default().with_api_url("ftp://nowhere");
        let err = ApiClient::new(config, SessionContext::in_memory()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig { .. }));
    }

    #[test]
    fn test_json_body_kind() {
        let body = RequestBody::json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(format!("{:?}", body), "json");
    }
}
