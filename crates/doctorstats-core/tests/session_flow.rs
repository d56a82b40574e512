//! Session lifecycle against the mock backend: bearer header, login,
//! 401 handling, bootstrap from a persisted token.

mod common;

use common::{MockBackend, EMAIL, PASSWORD, TOKEN};
use doctorstats_core::event::LogoutReason;
use doctorstats_core::{
    AuthPhase, ClientError, FileTokenStore, Route, SessionEvent, TokenStore,
};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_bearer_header_only_when_token_present() {
    let backend = MockBackend::start().await;
    let (services, _store) = backend.services();

    // Anonymous request: no Authorization header at all
    let err = services.datasets.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    let anonymous = backend.requests_to("/datasets");
    assert_eq!(anonymous.len(), 1);
    assert!(anonymous[0].authorization.is_none());

    services.auth.login(EMAIL, PASSWORD).await.unwrap();
    backend.clear();

    let datasets = services.datasets.list().await.unwrap();
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].id.as_str(), "42");

    let authed = backend.requests_to("/datasets");
    assert_eq!(
        authed[0].authorization.as_deref(),
        Some(format!("Bearer {}", TOKEN).as_str())
    );
}

#[tokio::test]
async fn test_login_sends_username_form_then_fetches_profile() {
    let backend = MockBackend::start().await;
    let (services, store) = backend.services();
    let mut events = services.session().events().subscribe();

    let user = services.auth.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.name, "Ada");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);

    let login = &requests[0];
    assert_eq!(login.method, "POST");
    assert_eq!(login.path, "/api/v1/auth/login");
    assert!(login
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("application/x-www-form-urlencoded"));
    assert!(login.body.contains("username=ada%40example.com"));
    assert!(login.body.contains("password=secret1"));
    assert!(login.authorization.is_none());

    let me = &requests[1];
    assert_eq!(me.path, "/api/v1/users/me");
    assert_eq!(me.authorization.as_deref(), Some("Bearer good-token"));

    let state = services.session().snapshot();
    assert_eq!(state.token.as_deref(), Some(TOKEN));
    assert_eq!(state.user.unwrap().email, EMAIL);
    assert!(!state.is_loading);
    assert_eq!(store.get().as_deref(), Some(TOKEN));

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedIn {
            email: EMAIL.to_string()
        }
    );
}

#[tokio::test]
async fn test_bad_login_leaves_session_anonymous_with_error() {
    let backend = MockBackend::start().await;
    let (services, store) = backend.services();

    let err = services.auth.login("bad@x.com", "wrong").await.unwrap_err();
    match &err {
        ClientError::InvalidCredentials { message, .. } => {
            assert_eq!(message, "Incorrect email or password")
        }
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
    assert_eq!(err.alert_message("Login failed"), "Incorrect email or password");

    let state = services.session().snapshot();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert_eq!(
        state.phase(),
        AuthPhase::Failed("Incorrect email or password".to_string())
    );
    assert!(store.get().is_none());

    // Profile is never requested after a rejected login
    assert!(backend.requests_to("/users/me").is_empty());
}

#[tokio::test]
async fn test_unauthorized_response_expires_session_once() {
    let backend = MockBackend::start().await;
    let (services, store) = backend.services();
    services.auth.login(EMAIL, PASSWORD).await.unwrap();
    let mut events = services.session().events().subscribe();

    let err = services.reports.get("7").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));

    // Session cleared, persisted token removed
    assert!(services.session().token().is_none());
    assert!(services.session().user().is_none());
    assert!(store.get().is_none());

    // No retry
    assert_eq!(backend.requests_to("/reports/7").len(), 1);

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::Unauthorized
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Navigate(Route::Login)
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_server_error_surfaces_detail_and_keeps_session() {
    let backend = MockBackend::start().await;
    let (services, _store) = backend.services();
    services.auth.login(EMAIL, PASSWORD).await.unwrap();

    let err = services.reports.list().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.alert_message("Failed to load reports"), "Database unavailable");
    assert!(services.session().is_authenticated());
}

#[tokio::test]
async fn test_register_posts_multipart_and_does_not_authenticate() {
    let backend = MockBackend::start().await;
    let (services, _store) = backend.services();

    let user = services
        .auth
        .register("new@example.com", "secret1", "New User")
        .await
        .unwrap();
    assert_eq!(user.email, "new@example.com");
    assert!(!services.session().is_authenticated());

    let request = &backend.requests_to("/auth/register")[0];
    assert!(request
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("multipart/form-data"));
    assert!(request.body.contains("name=\"username\""));
    assert!(request.body.contains("new@example.com"));
    assert!(request.body.contains("name=\"name\""));
}

#[tokio::test]
async fn test_bootstrap_restores_persisted_token() {
    let backend = MockBackend::start().await;
    let dir = TempDir::new().unwrap();

    {
        let services = backend.services_with_store(Arc::new(FileTokenStore::new(dir.path())));
        services.auth.login(EMAIL, PASSWORD).await.unwrap();
    }

    // Fresh process: token on disk, user not persisted
    let services = backend.services_with_store(Arc::new(FileTokenStore::new(dir.path())));
    assert!(services.session().user().is_none());

    let user = services.auth.bootstrap().await.unwrap().unwrap();
    assert_eq!(user.email, EMAIL);
    let state = services.session().snapshot();
    assert_eq!(state.token.as_deref(), Some(TOKEN));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_bootstrap_with_rejected_token_logs_out() {
    let backend = MockBackend::start().await;
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path()));
    store.set("stale-token").unwrap();

    let services = backend.services_with_store(store.clone());
    assert!(services.auth.bootstrap().await.unwrap().is_none());
    assert!(store.get().is_none());
    assert_eq!(services.session().phase(), AuthPhase::Anonymous);
}

#[tokio::test]
async fn test_bootstrap_without_token_sends_nothing() {
    let backend = MockBackend::start().await;
    let (services, _store) = backend.services();
    assert!(services.auth.bootstrap().await.unwrap().is_none());
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn test_logout_is_local() {
    let backend = MockBackend::start().await;
    let (services, store) = backend.services();
    services.auth.login(EMAIL, PASSWORD).await.unwrap();
    let before = backend.request_count();

    services.auth.logout();

    assert!(store.get().is_none());
    assert!(!services.session().is_authenticated());
    assert_eq!(backend.request_count(), before);
}

#[tokio::test]
async fn test_subscription_envelope_unwrapped() {
    let backend = MockBackend::start().await;
    let (services, _store) = backend.services();
    services.auth.login(EMAIL, PASSWORD).await.unwrap();

    let subscription = services.users.subscription().await.unwrap();
    assert_eq!(subscription.tier, "free");
    assert_eq!(subscription.features["max_datasets"], 3);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = doctorstats_core::ClientConfig::default().with_api_url(format!("http://{}/api/v1", addr));
    let services =
        doctorstats_core::Services::connect(config, doctorstats_core::SessionContext::in_memory())
            .unwrap();

    let err = services.auth.login(EMAIL, PASSWORD).await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));
    assert_eq!(
        err.alert_message("Login failed"),
        doctorstats_core::error::NETWORK_ERROR_MESSAGE
    );
    assert!(services.session().token().is_none());
}
