//! Session and user profile data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-issued proof of authenticated identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Paid/free plan marker on the profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Free,
    Paid,
}

/// `users` table row. An empty `full_name` means profile setup has not been
/// completed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(rename = "class")]
    pub class_level: String,
    pub heard_from: String,
    pub tokens_month: i64,
    pub tokens_day: i64,
    pub status: PlanStatus,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn needs_setup(&self) -> bool {
        self.full_name.is_empty()
    }
}

/// Partial update against the profile row; only the set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heard_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_day: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    DuplicateAccount,

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected auth response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileUpdateError {
    #[error("no active session")]
    NoSession,

    #[error("profile update rejected: {0}")]
    Rejected(#[from] crate::common::BackendError),
}
