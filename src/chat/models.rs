//! Chat message and webhook wire models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Webhook endpoint used when no `chat_webhook` row is configured.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://n8n-uwso.onrender.com/webhook-test/sauvonstonexam.ai";

/// Assistant text used when the webhook reply carries no `text` field.
pub const APOLOGY_TEXT: &str =
    "I apologize, but I encountered an error processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// `chat_history` table row. Append-only; ordered by `created_at` ascending
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Client-generated message id, derived from the creation timestamp as
    /// epoch milliseconds. `offset` keeps the assistant id distinct when both
    /// messages of an exchange land in the same millisecond.
    pub fn client_id(created_at: DateTime<Utc>, offset: i64) -> String {
        (created_at.timestamp_millis() + offset).to_string()
    }
}

/// JSON body POSTed to the configured chat webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub message: String,
    pub user_id: String,
    pub email: String,
    /// Balance after this exchange: `tokens_day - 1`.
    pub tokens_left: i64,
    pub credentials: HashMap<String, String>,
    pub parameters: HashMap<String, String>,
}

/// JSON body the webhook answers with. All fields are optional; a missing
/// `text` falls back to [`APOLOGY_TEXT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub sources: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Network(String),

    #[error("webhook returned HTTP {0}")]
    BadStatus(u16),

    #[error("webhook returned invalid JSON: {0}")]
    InvalidJson(String),
}
