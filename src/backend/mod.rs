//! # Backend Module
//!
//! Remote data client for the hosted table backend (GoTrue auth plus a
//! PostgREST-style row API). The `RemoteStore` and `ChatWebhook` traits are
//! the seams the rest of the app talks through; `SupabaseBackend` and
//! `HttpWebhook` are the HTTP implementations.

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::auth::models::{AuthError, ProfileUpdate, Session, UserProfile};
use crate::chat::models::{ChatMessage, WebhookReply, WebhookRequest};
use crate::common::BackendError;
use models::{CredentialRecord, ParameterRecord, ParameterUpsert, WebhookConfig, WebhookRecord};
use std::collections::HashMap;

pub use client::{BackendConfig, HttpWebhook, SupabaseBackend};

/// Hosted backend: auth endpoints plus row operations on the `users`,
/// `chat_history`, `webhooks`, `credentials` and `parameters` tables.
///
/// The implementation owns the current session the way the hosted client
/// library does; `set_session` is called on restore and on sign-out so row
/// operations carry the right bearer token.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    /// Remote session invalidation. Local state is cleared by the caller
    /// regardless of the outcome here.
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn set_session(&self, session: Option<Session>);

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError>;
    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<(), BackendError>;

    /// Chat history for one user, ordered by `created_at` ascending.
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, BackendError>;
    async fn insert_message(&self, message: &ChatMessage) -> Result<(), BackendError>;

    async fn fetch_webhook(&self, name: &str) -> Result<Option<WebhookRecord>, BackendError>;
    /// Credentials flagged for inclusion in the chat webhook payload.
    async fn fetch_chat_credentials(&self) -> Result<Vec<CredentialRecord>, BackendError>;
    async fn fetch_parameters(&self) -> Result<Vec<ParameterRecord>, BackendError>;
    async fn fetch_parameter(&self, name: &str) -> Result<Option<ParameterRecord>, BackendError>;

    async fn upsert_webhook(&self, webhook: &WebhookConfig) -> Result<(), BackendError>;
    async fn upsert_parameter(&self, param: &ParameterUpsert) -> Result<(), BackendError>;
}

/// Outbound chat webhook call: one POST, one JSON reply, no retries.
#[async_trait]
pub trait ChatWebhook: Send + Sync {
    async fn dispatch(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &WebhookRequest,
    ) -> Result<WebhookReply, crate::chat::models::WebhookError>;
}
