//! Login, registration, logout and session bootstrap

use crate::error::ClientError;
use crate::forms::LoginForm;
use crate::http::{ApiClient, RequestBody};
use crate::session::SessionAction;
use doctorstats_types::{TokenResponse, UserProfile};
use reqwest::{multipart, Method};

/// Alert text when the server rejects credentials without a detail
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

#[derive(Clone, Debug)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token, fetch the profile with it, and
    /// establish the session.
    ///
    /// On failure the session stays unauthenticated and carries the error
    /// message.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        LoginForm::new(email, password).validate()?;

        let session = self.client.session();
        session.dispatch(SessionAction::SetLoading(true));

        match self.authenticate(email, password).await {
            Ok((token, user)) => {
                session.login(token, user.clone());
                Ok(user)
            }
            Err(err) => {
                session.dispatch(SessionAction::SetError(
                    err.alert_message(LOGIN_FAILED_MESSAGE),
                ));
                Err(err)
            }
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, UserProfile), ClientError> {
        let fields = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let token: TokenResponse = self
            .client
            .post_form("/auth/login", fields)
            .await
            .map_err(rejected_credentials)?;

        let user: UserProfile = self
            .client
            .send_with_token(Method::GET, "/users/me", RequestBody::Empty, &token.access_token)
            .await?
            .json()?;

        Ok((token.access_token, user))
    }

    /// Create an account. Does not authenticate; call [`AuthService::login`] next.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserProfile, ClientError> {
        let form = multipart::Form::new()
            .text("username", email.to_string())
            .text("password", password.to_string())
            .text("name", name.to_string());
        let user: UserProfile = self.client.post_multipart("/auth/register", form).await?;
        tracing::info!(email = %user.email, "registered account");
        Ok(user)
    }

    /// Clear the session locally. No server call.
    pub fn logout(&self) {
        self.client.session().logout();
    }

    /// Restore a persisted token and re-fetch the profile it belongs to.
    ///
    /// Returns `Ok(None)` when there was no token or the server rejected it
    /// (the session has then been expired).
    pub async fn bootstrap(&self) -> Result<Option<UserProfile>, ClientError> {
        let session = self.client.session();
        if session.restore().is_none() {
            return Ok(None);
        }

        match self.client.get_json::<UserProfile>("/users/me").await {
            Ok(user) => {
                session.finish_bootstrap(Some(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                session.finish_bootstrap(None);
                if err.is_unauthorized() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

/// A 401/400/422 from the token endpoint means bad credentials, not an expired session
fn rejected_credentials(err: ClientError) -> ClientError {
    match err {
        ClientError::Unauthorized { detail } => ClientError::InvalidCredentials {
            status: 401,
            message: detail.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
        },
        ClientError::Server {
            status: status @ (400 | 422),
            detail,
        } => ClientError::InvalidCredentials {
            status,
            message: detail.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
        },
        other => other,
    }
}
