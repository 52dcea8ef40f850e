//! # Chat Module
//!
//! Chat history and the per-message webhook exchange:
//! - optimistic append of the user message before any network call
//! - auxiliary config/credential/parameter lookup
//! - one POST to the configured webhook, no retries
//! - token decrement and profile reconciliation

pub mod models;
pub mod screen;

#[cfg(test)]
mod tests;

pub use models::{ChatMessage, Role, WebhookReply, WebhookRequest};
pub use screen::{ChatScreen, SendError};
