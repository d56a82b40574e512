//! User and authentication models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Token issued by `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Current user as returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default = "default_tier")]
    pub subscription_tier: String,
}

fn default_tier() -> String {
    "free".to_string()
}

/// Partial profile update for `PUT /users/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.organization.is_none()
    }
}

/// Subscription details from `GET /users/subscription`
///
/// The backend wraps the payload as `{ "success": .., "data": { "tier", "features" } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub tier: String,
    #[serde(default)]
    pub features: BTreeMap<String, Value>,
}
