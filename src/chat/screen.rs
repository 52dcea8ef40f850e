//! Chat screen state and the strictly-ordered send sequence.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{error, info};

use crate::auth::models::{ProfileUpdate, ProfileUpdateError, UserProfile};
use crate::backend::models::{fold_credentials, fold_parameters};
use crate::chat::models::{
    ChatMessage, Role, WebhookError, WebhookRequest, APOLOGY_TEXT, DEFAULT_WEBHOOK_URL,
};
use crate::common::{AppContext, BackendError};

/// Alert title/body shown when the daily token balance is exhausted.
pub const NO_TOKENS_TITLE: &str = "No Tokens Remaining";
pub const NO_TOKENS_BODY: &str =
    "You've used all your tokens. Upgrade to continue or wait for your daily refresh.";

/// Failure inside the delivery sequence. Everything after the optimistic
/// append collapses into this; the real cause is logged, not shown.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Profile(#[from] ProfileUpdateError),
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Rejected before any network call: nothing to send.
    #[error("message is empty")]
    EmptyInput,

    /// Rejected before any network call: daily balance exhausted.
    #[error("{}", NO_TOKENS_BODY)]
    NoTokens,

    #[error("not signed in")]
    NotSignedIn,

    /// Generic user-facing failure; the optimistic message stays visible.
    #[error("Failed to send message. Please try again.")]
    Delivery(#[source] DeliveryError),
}

/// In-memory chat state plus the send/history operations.
pub struct ChatScreen {
    ctx: AppContext,
    pub messages: Vec<ChatMessage>,
    /// Advisory guard: the UI disables the send control while true.
    pub loading: bool,
    pub loading_history: bool,
}

impl ChatScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            messages: Vec::new(),
            loading: false,
            loading_history: true,
        }
    }

    /// Load this user's history, ordered by `created_at` ascending.
    /// Failures leave the list empty; the screen stays usable.
    pub async fn load_history(&mut self) {
        if let Some(user) = self.ctx.auth.state().user {
            match self.ctx.store.fetch_history(&user.id).await {
                Ok(rows) => self.messages = rows,
                Err(e) => error!(error = %e, "Error loading chat history"),
            }
        }
        self.loading_history = false;
    }

    /// Send one message through the webhook exchange.
    ///
    /// Preconditions (no network call when violated): trimmed input is
    /// non-empty and `tokens_day > 0`. On success the message list has grown
    /// by exactly two entries (user then assistant) and the daily balance has
    /// been decremented by one. A failure after the optimistic append keeps
    /// the user message visible; there is no rollback and no retry.
    pub async fn send_message(&mut self, input: &str) -> Result<(), SendError> {
        let text = input.trim().to_string();
        if text.is_empty() {
            return Err(SendError::EmptyInput);
        }
        let user = self.ctx.auth.state().user.ok_or(SendError::NotSignedIn)?;
        if user.tokens_day <= 0 {
            return Err(SendError::NoTokens);
        }

        let created_at = Utc::now();
        let user_message = ChatMessage {
            id: ChatMessage::client_id(created_at, 0),
            user_id: user.id.clone(),
            role: Role::User,
            text: text.clone(),
            images: None,
            youtube: None,
            source_url: None,
            created_at,
        };

        // Optimistic append, before any network call.
        self.messages.push(user_message.clone());
        self.loading = true;

        let result = self.deliver(&user, &text, user_message).await;
        self.loading = false;
        result.map_err(|e| {
            error!(error = %e, "Error sending message");
            SendError::Delivery(e)
        })
    }

    /// Steps 2-7 of the exchange, in order. Any failure here surfaces as one
    /// generic alert; whatever already happened stays done.
    async fn deliver(
        &mut self,
        user: &UserProfile,
        text: &str,
        user_message: ChatMessage,
    ) -> Result<(), DeliveryError> {
        self.ctx.store.insert_message(&user_message).await?;

        let webhook = self.ctx.store.fetch_webhook("chat_webhook").await?;
        let credentials = fold_credentials(&self.ctx.store.fetch_chat_credentials().await?);
        let parameters = fold_parameters(&self.ctx.store.fetch_parameters().await?);

        let (url, headers) = match webhook {
            Some(w) => (w.url, w.headers),
            None => (DEFAULT_WEBHOOK_URL.to_string(), HashMap::new()),
        };

        let request = WebhookRequest {
            message: text.to_string(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            tokens_left: user.tokens_day - 1,
            credentials,
            parameters,
        };
        let reply = self.ctx.webhook.dispatch(&url, &headers, &request).await?;
        info!(user_id = %user.id, "Chat webhook exchange completed");

        let created_at = Utc::now();
        let assistant_message = ChatMessage {
            id: ChatMessage::client_id(created_at, 1),
            user_id: user.id.clone(),
            role: Role::Assistant,
            text: reply.text.unwrap_or_else(|| APOLOGY_TEXT.to_string()),
            images: None,
            youtube: reply.youtube,
            source_url: reply.sources,
            created_at,
        };
        self.messages.push(assistant_message.clone());
        self.ctx.store.insert_message(&assistant_message).await?;

        // Decrement by exactly one, then re-fetch the full profile to pick up
        // any other server-side changes. No idempotency guard: a manual retry
        // after a partial failure can decrement twice.
        self.ctx
            .auth
            .update_user_profile(ProfileUpdate {
                tokens_day: Some(user.tokens_day - 1),
                ..Default::default()
            })
            .await?;

        Ok(())
    }
}
