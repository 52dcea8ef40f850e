//! In-memory fakes for the remote store and the chat webhook, shared by the
//! per-module unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::models::{
    AuthError, PlanStatus, ProfileUpdate, Session, UserProfile,
};
use crate::auth::{AuthContext, SessionStore};
use crate::backend::models::{
    CredentialRecord, ParameterKind, ParameterRecord, ParameterUpsert, WebhookConfig,
    WebhookRecord,
};
use crate::backend::{ChatWebhook, RemoteStore};
use crate::chat::models::{ChatMessage, WebhookError, WebhookReply, WebhookRequest};
use crate::common::BackendError;

pub fn profile(id: &str, full_name: &str, tokens_day: i64) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        full_name: full_name.to_string(),
        class_level: "Grade 11".to_string(),
        heard_from: "School".to_string(),
        tokens_month: 300,
        tokens_day,
        status: PlanStatus::Free,
        is_admin: false,
        created_at: Utc::now(),
    }
}

pub fn session_for(user: &UserProfile) -> Session {
    Session {
        access_token: format!("token-{}", user.id),
        refresh_token: format!("refresh-{}", user.id),
        user_id: user.id.clone(),
        email: user.email.clone(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

#[derive(Default)]
pub struct StoreData {
    pub users: HashMap<String, UserProfile>,
    pub history: Vec<ChatMessage>,
    pub webhooks: HashMap<String, WebhookRecord>,
    pub credentials: Vec<CredentialRecord>,
    pub parameters: Vec<ParameterRecord>,
    pub session: Option<Session>,
    pub webhook_upserts: usize,
    pub parameter_upserts: usize,
}

/// RemoteStore fake backed by plain maps.
#[derive(Default)]
pub struct InMemoryStore {
    pub data: Mutex<StoreData>,
    pub fail_sign_out: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store seeded with one user and an active session for them.
    pub fn with_user(user: UserProfile) -> (Arc<Self>, Session) {
        let store = Self::new();
        let session = session_for(&user);
        {
            let mut data = store.data.lock().unwrap();
            data.users.insert(user.id.clone(), user);
            data.session = Some(session.clone());
        }
        (store, session)
    }

    pub fn seed_parameter(&self, name: &str, value: &str, kind: ParameterKind) {
        self.data.lock().unwrap().parameters.push(ParameterRecord {
            name: name.to_string(),
            value: value.to_string(),
            kind,
        });
    }

    pub fn seed_credential(&self, name: &str, value: &str, chat: bool) {
        self.data.lock().unwrap().credentials.push(CredentialRecord {
            name: name.to_string(),
            value: value.to_string(),
            send_to_chat_webhook: chat,
            send_to_payment_webhook: false,
        });
    }

    pub fn history_len(&self) -> usize {
        self.data.lock().unwrap().history.len()
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let _ = password;
        let mut data = self.data.lock().unwrap();
        if data.users.values().any(|u| u.email == email) {
            return Err(AuthError::DuplicateAccount);
        }
        let id = format!("user-{}", data.users.len() + 1);
        let mut user = profile(&id, "", 10);
        user.email = email.to_string();
        let session = session_for(&user);
        data.users.insert(id, user);
        data.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        let mut data = self.data.lock().unwrap();
        let user = data
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        let session = session_for(&user);
        data.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Network("connection refused".to_string()));
        }
        self.data.lock().unwrap().session = None;
        Ok(())
    }

    async fn set_session(&self, session: Option<Session>) {
        self.data.lock().unwrap().session = session;
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        Ok(self.data.lock().unwrap().users.get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileUpdate,
    ) -> Result<(), BackendError> {
        let mut data = self.data.lock().unwrap();
        let user = data.users.get_mut(user_id).ok_or(BackendError::Status {
            status: 404,
            body: "no such user".to_string(),
        })?;
        if let Some(full_name) = &changes.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(class_level) = &changes.class_level {
            user.class_level = class_level.clone();
        }
        if let Some(heard_from) = &changes.heard_from {
            user.heard_from = heard_from.clone();
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        if let Some(tokens_day) = changes.tokens_day {
            user.tokens_day = tokens_day;
        }
        Ok(())
    }

    async fn fetch_history(&self, user_id: &str) -> Result<Vec<ChatMessage>, BackendError> {
        let mut rows: Vec<ChatMessage> = self
            .data
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), BackendError> {
        self.data.lock().unwrap().history.push(message.clone());
        Ok(())
    }

    async fn fetch_webhook(&self, name: &str) -> Result<Option<WebhookRecord>, BackendError> {
        Ok(self.data.lock().unwrap().webhooks.get(name).cloned())
    }

    async fn fetch_chat_credentials(&self) -> Result<Vec<CredentialRecord>, BackendError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .credentials
            .iter()
            .filter(|c| c.send_to_chat_webhook)
            .cloned()
            .collect())
    }

    async fn fetch_parameters(&self) -> Result<Vec<ParameterRecord>, BackendError> {
        Ok(self.data.lock().unwrap().parameters.clone())
    }

    async fn fetch_parameter(&self, name: &str) -> Result<Option<ParameterRecord>, BackendError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .parameters
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn upsert_webhook(&self, webhook: &WebhookConfig) -> Result<(), BackendError> {
        let mut data = self.data.lock().unwrap();
        data.webhook_upserts += 1;
        data.webhooks.insert(
            webhook.name.clone(),
            WebhookRecord {
                name: webhook.name.clone(),
                url: webhook.url.clone(),
                headers: webhook.headers.clone(),
            },
        );
        Ok(())
    }

    async fn upsert_parameter(&self, param: &ParameterUpsert) -> Result<(), BackendError> {
        let mut data = self.data.lock().unwrap();
        data.parameter_upserts += 1;
        if let Some(existing) = data.parameters.iter_mut().find(|p| p.name == param.name) {
            existing.value = param.value.clone();
            existing.kind = param.kind;
        } else {
            data.parameters.push(ParameterRecord {
                name: param.name.clone(),
                value: param.value.clone(),
                kind: param.kind,
            });
        }
        Ok(())
    }
}

/// ChatWebhook fake that records every dispatch.
pub struct FakeWebhook {
    pub calls: Mutex<Vec<(String, HashMap<String, String>, WebhookRequest)>>,
    pub reply: Mutex<WebhookReply>,
    pub fail: AtomicBool,
}

impl FakeWebhook {
    pub fn replying(reply: WebhookReply) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(reply),
            fail: AtomicBool::new(false),
        })
    }

    pub fn with_text(text: &str) -> Arc<Self> {
        Self::replying(WebhookReply {
            text: Some(text.to_string()),
            youtube: None,
            sources: None,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatWebhook for FakeWebhook {
    async fn dispatch(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &WebhookRequest,
    ) -> Result<WebhookReply, WebhookError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(WebhookError::Network("connection reset".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), headers.clone(), body.clone()));
        Ok(self.reply.lock().unwrap().clone())
    }
}

/// AuthContext wired to a fake store, with the session file in a temp dir.
pub fn auth_context(store: Arc<InMemoryStore>) -> (Arc<AuthContext>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionStore::at(dir.path().join("session.json"));
    (Arc::new(AuthContext::new(store, sessions)), dir)
}

/// Full AppContext for a signed-in user: fake store seeded with the profile,
/// session restored, webhook fake wired in.
pub async fn app_context_for(
    user: UserProfile,
    webhook: Arc<FakeWebhook>,
) -> (crate::common::AppContext, Arc<InMemoryStore>, tempfile::TempDir) {
    let (store, session) = InMemoryStore::with_user(user);
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionStore::at(dir.path().join("session.json"));
    sessions.save(&session);
    let auth = Arc::new(AuthContext::new(store.clone(), sessions));
    auth.restore().await;
    let ctx = crate::common::AppContext::new(store.clone(), webhook, auth);
    (ctx, store, dir)
}
