//! In-process mock of the Doctor Stats REST API
//!
//! Every request is recorded (method, path, auth header, content type, body)
//! before it reaches a handler, so tests can assert on exactly what the client
//! sent and how many times.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use doctorstats_core::{ClientConfig, MemoryTokenStore, Services, SessionContext, TokenStore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "secret1";
pub const TOKEN: &str = "good-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<Recorded>>,
    /// Status fetches of the scripted analysis `an-1`
    status_fetches: AtomicUsize,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/register", post(register))
            .route("/api/v1/users/me", get(me))
            .route("/api/v1/users/subscription", get(subscription))
            .route("/api/v1/datasets", get(list_datasets))
            .route("/api/v1/datasets/upload", post(upload_dataset))
            .route("/api/v1/analysis", post(create_analysis))
            .route("/api/v1/analysis/{id}", get(get_analysis))
            .route("/api/v1/analysis/{id}/results", get(analysis_results))
            .route("/api/v1/reports", get(list_reports))
            .route("/api/v1/reports/{id}", get(get_report))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_api_url(self.api_url())
            .with_poll_interval(Duration::from_millis(20))
    }

    /// Services over a fresh in-memory session
    pub fn services(&self) -> (Services, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        let services = self.services_with_store(store.clone());
        (services, store)
    }

    pub fn services_with_store(&self, store: Arc<dyn TokenStore>) -> Services {
        let session = SessionContext::new(store);
        Services::connect(self.config(), session).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        let full = format!("/api/v1{}", path);
        self.requests()
            .into_iter()
            .filter(|r| r.path == full)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.state.requests.lock().unwrap().clear();
    }

    pub fn status_fetches(&self) -> usize {
        self.state.status_fetches.load(Ordering::SeqCst)
    }
}

async fn record(State(state): State<Arc<MockState>>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

fn user() -> Value {
    json!({"email": EMAIL, "name": "Ada", "organization": "St. Elsewhere", "subscription_tier": "free"})
}

async fn login(Form(fields): Form<HashMap<String, String>>) -> Response {
    let username = fields.get("username").map(String::as_str);
    let password = fields.get("password").map(String::as_str);
    if username == Some(EMAIL) && password == Some(PASSWORD) {
        Json(json!({"access_token": TOKEN, "token_type": "bearer"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response()
    }
}

async fn register() -> Response {
    Json(json!({"email": "new@example.com", "name": "New User"})).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(user()).into_response()
}

async fn subscription(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": {"tier": "free", "features": {"max_datasets": 3, "export": false}}
    }))
    .into_response()
}

async fn list_datasets(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 42, "name": "trial", "row_count": 120, "column_info": {"age": "int64", "arm": "object"}}
    ]))
    .into_response()
}

async fn upload_dataset(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": 42,
        "name": "data",
        "description": "CSV file upload",
        "row_count": 2,
        "column_info": {"age": "int64", "arm": "object"},
        "created_at": "2024-05-01T10:00:00"
    }))
    .into_response()
}

async fn create_analysis(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": "an-1",
        "dataset_id": body["dataset_id"],
        "type": body["analysis_type"],
        "status": "pending",
        "config": body["config"]
    }))
    .into_response()
}

fn basic_results() -> Value {
    json!({
        "descriptive_statistics": {"age": {"mean": 41.5, "std": 9.2, "min": 22.0, "max": 67.0}},
        "missing_data": {"age": {"count": 0.0, "percentage": 0.0}},
        "column_types": {"age": "int64"}
    })
}

async fn get_analysis(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match id.as_str() {
        "an-1" => {
            let n = state.status_fetches.fetch_add(1, Ordering::SeqCst);
            let record = match n {
                0 => json!({"id": "an-1", "type": "basic", "status": "pending"}),
                1 => json!({"id": "an-1", "type": "basic", "status": "processing"}),
                _ => json!({"id": "an-1", "type": "basic", "status": "completed", "results": basic_results()}),
            };
            Json(record).into_response()
        }
        "an-failed" => Json(json!({
            "id": "an-failed",
            "type": "regression",
            "status": "failed",
            "error": "Dependent variable 'weight' has no numeric values"
        }))
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Analysis not found"})),
        )
            .into_response(),
    }
}

async fn analysis_results(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.status_fetches.load(Ordering::SeqCst) < 3 {
        return (
            StatusCode::ACCEPTED,
            Json(json!({"detail": "Analysis in progress"})),
        )
            .into_response();
    }
    Json(basic_results()).into_response()
}

async fn list_reports(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "Database unavailable"})),
    )
        .into_response()
}

/// Always rejects the token, whatever it is
async fn get_report(Path(_id): Path<String>) -> Response {
    unauthorized()
}
