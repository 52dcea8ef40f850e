// src/backend/client.rs
//
// HTTP implementations of the RemoteStore and ChatWebhook seams against a
// Supabase-style backend: GoTrue auth endpoints plus the PostgREST row API.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::auth::models::{AuthError, ProfileUpdate, Session, UserProfile};
use crate::chat::models::{ChatMessage, WebhookError, WebhookReply, WebhookRequest};
use crate::common::BackendError;

use super::models::{
    CredentialRecord, ParameterRecord, ParameterUpsert, WebhookConfig, WebhookRecord,
};
use super::{ChatWebhook, RemoteStore};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl BackendConfig {
    /// Read `STEXAM_BACKEND_URL` and `STEXAM_ANON_KEY` from the environment.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("STEXAM_BACKEND_URL").ok()?;
        let anon_key = env::var("STEXAM_ANON_KEY").ok()?;
        Some(Self { base_url, anon_key })
    }
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

/// Reqwest-backed [`RemoteStore`]. Holds the active session the way the
/// hosted client library does, so row operations carry the user's bearer
/// token once signed in and the anon key before that.
pub struct SupabaseBackend {
    http: Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl SupabaseBackend {
    pub fn new(config: BackendConfig) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            session: RwLock::new(None),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn bearer(&self) -> String {
        match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        }
    }

    async fn auth_request(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<(reqwest::StatusCode, String), AuthError> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok((status, text))
    }

    fn decode_session(body: &str) -> Result<Session, AuthError> {
        let decoded: AuthResponse = serde_json::from_str(body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(Session {
            access_token: decoded.access_token,
            refresh_token: decoded.refresh_token,
            user_id: decoded.user.id,
            email: decoded.user.email,
            expires_at: Utc::now() + Duration::seconds(decoded.expires_in),
        })
    }

    /// Human-readable message out of a GoTrue error body.
    fn auth_error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["msg", "error_description", "message"]
                    .iter()
                    .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(String::from))
            })
            .unwrap_or_else(|| body.to_string())
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let response = self
            .http
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer().await)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(table = %table, status = %status, body = %body, "Row fetch failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn write_rows<T: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        table: &str,
        query: &[(&str, String)],
        prefer: &str,
        body: &T,
    ) -> Result<(), BackendError> {
        let response = self
            .http
            .request(method, self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", prefer)
            .bearer_auth(self.bearer().await)
            .query(query)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(table = %table, status = %status, body = %body, "Row write failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for SupabaseBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let (status, body) = self
            .auth_request(
                &self.auth_url("signup"),
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        if !status.is_success() {
            let message = Self::auth_error_message(&body);
            warn!(status = %status, message = %message, "Sign-up rejected");
            if message.to_lowercase().contains("already registered") {
                return Err(AuthError::DuplicateAccount);
            }
            return Err(AuthError::InvalidResponse(message));
        }

        let session = Self::decode_session(&body)?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let (status, body) = self
            .auth_request(
                &format!("{}?grant_type=password", self.auth_url("token")),
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;

        if !status.is_success() {
            let message = Self::auth_error_message(&body);
            warn!(status = %status, message = %message, "Sign-in rejected");
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(AuthError::InvalidCredentials);
            }
            return Err(AuthError::InvalidResponse(message));
        }

        let session = Self::decode_session(&body)?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.bearer().await;
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        *self.session.write().await = None;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::InvalidResponse(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let rows: Vec<UserProfile> = self
            .get_rows(
                "users",
                &[
                    ("id", format!("eq.{}", user_id)),
                    ("select", "*".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<(), BackendError> {
        self.write_rows(
            reqwest::Method::PATCH,
            "users",
            &[("id", format!("eq.{}", user_id))],
            "return=minimal",
            changes,
        )
        .await
    }

    async fn fetch_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, BackendError> {
        self.get_rows(
            "chat_history",
            &[
                ("user_id", format!("eq.{}", user_id)),
                ("select", "*".to_string()),
                ("order", "created_at.asc".to_string()),
            ],
        )
        .await
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), BackendError> {
        self.write_rows(
            reqwest::Method::POST,
            "chat_history",
            &[],
            "return=minimal",
            message,
        )
        .await
    }

    async fn fetch_webhook(&self, name: &str) -> Result<Option<WebhookRecord>, BackendError> {
        let rows: Vec<WebhookRecord> = self
            .get_rows("webhooks", &[("name", format!("eq.{}", name))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_chat_credentials(&self) -> Result<Vec<CredentialRecord>, BackendError> {
        self.get_rows(
            "credentials",
            &[("send_to_chat_webhook", "eq.true".to_string())],
        )
        .await
    }

    async fn fetch_parameters(&self) -> Result<Vec<ParameterRecord>, BackendError> {
        self.get_rows("parameters", &[]).await
    }

    async fn fetch_parameter(&self, name: &str) -> Result<Option<ParameterRecord>, BackendError> {
        let rows: Vec<ParameterRecord> = self
            .get_rows("parameters", &[("name", format!("eq.{}", name))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_webhook(&self, webhook: &WebhookConfig) -> Result<(), BackendError> {
        self.write_rows(
            reqwest::Method::POST,
            "webhooks",
            &[("on_conflict", "name".to_string())],
            "resolution=merge-duplicates,return=minimal",
            webhook,
        )
        .await
    }

    async fn upsert_parameter(&self, param: &ParameterUpsert) -> Result<(), BackendError> {
        self.write_rows(
            reqwest::Method::POST,
            "parameters",
            &[("on_conflict", "name".to_string())],
            "resolution=merge-duplicates,return=minimal",
            param,
        )
        .await
    }
}

/// Reqwest-backed [`ChatWebhook`].
pub struct HttpWebhook {
    http: Client,
}

impl HttpWebhook {
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }
}

impl Default for HttpWebhook {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored custom headers merged under a fixed `Content-Type: application/json`.
fn merge_headers(custom: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in custom {
        if name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                map.insert(n, v);
            }
            _ => warn!(header = %name, "Skipping invalid webhook header"),
        }
    }
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    map
}

#[async_trait]
impl ChatWebhook for HttpWebhook {
    async fn dispatch(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &WebhookRequest,
    ) -> Result<WebhookReply, WebhookError> {
        debug!(url = %url, "Dispatching chat webhook request");

        let response = self
            .http
            .post(url)
            .headers(merge_headers(headers))
            .json(body)
            .send()
            .await
            .map_err(|e| WebhookError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = %status, "Chat webhook returned an error status");
            return Err(WebhookError::BadStatus(status.as_u16()));
        }

        response
            .json::<WebhookReply>()
            .await
            .map_err(|e| WebhookError::InvalidJson(e.to_string()))
    }
}
