use super::Envelope;
use crate::error::{ClientError, ValidationError};
use crate::http::ApiClient;
use doctorstats_types::{Subscription, UserProfile, UserUpdate};

/// Current-user profile and subscription
#[derive(Clone, Debug)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.client.get_json("/users/me").await
    }

    pub async fn update_me(&self, update: &UserUpdate) -> Result<UserProfile, ClientError> {
        if update.is_empty() {
            return Err(ValidationError::new("Nothing to update").into());
        }
        let user: UserProfile = self.client.put_json("/users/me", update).await?;
        tracing::info!(email = %user.email, "profile updated");
        Ok(user)
    }

    pub async fn subscription(&self) -> Result<Subscription, ClientError> {
        let envelope: Envelope<Subscription> = self.client.get_json("/users/subscription").await?;
        Ok(envelope.into_inner())
    }
}
