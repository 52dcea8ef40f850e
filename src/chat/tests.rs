//! Tests for the chat module: token gating, the optimistic append, the
//! webhook exchange and the persisted round-trip.

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use crate::backend::models::{ParameterKind, WebhookRecord};
use crate::chat::models::{Role, WebhookReply, APOLOGY_TEXT, DEFAULT_WEBHOOK_URL};
use crate::chat::{ChatScreen, SendError};
use crate::testing::{app_context_for, profile, FakeWebhook};

#[tokio::test]
async fn test_send_with_zero_tokens_is_blocked_before_any_network_call() {
    let webhook = FakeWebhook::with_text("hi");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 0), webhook.clone()).await;
    let mut screen = ChatScreen::new(ctx);

    let err = screen.send_message("hello?").await.unwrap_err();

    assert!(matches!(err, SendError::NoTokens));
    assert_eq!(webhook.call_count(), 0);
    assert_eq!(store.history_len(), 0);
    assert!(screen.messages.is_empty());
}

#[tokio::test]
async fn test_send_with_blank_input_is_rejected_silently() {
    let webhook = FakeWebhook::with_text("hi");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 10), webhook.clone()).await;
    let mut screen = ChatScreen::new(ctx);

    let err = screen.send_message("   \n").await.unwrap_err();

    assert!(matches!(err, SendError::EmptyInput));
    assert_eq!(webhook.call_count(), 0);
    assert_eq!(store.history_len(), 0);
}

#[tokio::test]
async fn test_successful_send_appends_two_messages_and_decrements_tokens() {
    let webhook = FakeWebhook::with_text("Photosynthesis converts light...");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 10), webhook.clone()).await;
    let auth = ctx.auth.clone();
    let mut screen = ChatScreen::new(ctx);

    screen.send_message("Explain photosynthesis").await.unwrap();

    assert_eq!(screen.messages.len(), 2);
    assert_eq!(screen.messages[0].role, Role::User);
    assert_eq!(screen.messages[0].text, "Explain photosynthesis");
    assert_eq!(screen.messages[1].role, Role::Assistant);
    assert_eq!(screen.messages[1].text, "Photosynthesis converts light...");
    assert!(screen.messages[1].youtube.is_none());
    assert!(screen.messages[1].source_url.is_none());

    assert_eq!(store.history_len(), 2);
    assert_eq!(auth.state().user.unwrap().tokens_day, 9);
    assert!(!screen.loading);
}

#[tokio::test]
async fn test_webhook_request_carries_folded_records_and_decremented_balance() {
    let webhook = FakeWebhook::with_text("ok");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 7), webhook.clone()).await;
    store.seed_credential("api_key", "k-123", true);
    store.seed_credential("payment_key", "p-456", false);
    store.seed_parameter("model", "fast", ParameterKind::Api);
    let mut screen = ChatScreen::new(ctx);

    screen.send_message("  question  ").await.unwrap();

    let calls = webhook.calls.lock().unwrap();
    let (url, _headers, body) = &calls[0];
    assert_eq!(url, DEFAULT_WEBHOOK_URL);
    assert_eq!(body.message, "question");
    assert_eq!(body.user_id, "u1");
    assert_eq!(body.tokens_left, 6);
    assert_eq!(body.credentials.get("api_key").unwrap(), "k-123");
    assert!(
        !body.credentials.contains_key("payment_key"),
        "only chat-flagged credentials are forwarded"
    );
    assert_eq!(body.parameters.get("model").unwrap(), "fast");
}

#[tokio::test]
async fn test_configured_webhook_url_and_headers_are_used() {
    let webhook = FakeWebhook::with_text("ok");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 3), webhook.clone()).await;
    {
        let mut data = store.data.lock().unwrap();
        let mut headers = HashMap::new();
        headers.insert("x-api-key".to_string(), "secret".to_string());
        data.webhooks.insert(
            "chat_webhook".to_string(),
            WebhookRecord {
                name: "chat_webhook".to_string(),
                url: "https://hooks.example.com/chat".to_string(),
                headers,
            },
        );
    }
    let mut screen = ChatScreen::new(ctx);

    screen.send_message("hello").await.unwrap();

    let calls = webhook.calls.lock().unwrap();
    let (url, headers, _body) = &calls[0];
    assert_eq!(url, "https://hooks.example.com/chat");
    assert_eq!(headers.get("x-api-key").unwrap(), "secret");
}

#[tokio::test]
async fn test_reply_without_text_falls_back_to_apology() {
    let webhook = FakeWebhook::replying(WebhookReply {
        text: None,
        youtube: Some("https://youtube.com/watch?v=abc".to_string()),
        sources: Some("https://example.com/source".to_string()),
    });
    let (ctx, _store, _dir) = app_context_for(profile("u1", "Alice", 2), webhook).await;
    let mut screen = ChatScreen::new(ctx);

    screen.send_message("hm").await.unwrap();

    let assistant = &screen.messages[1];
    assert_eq!(assistant.text, APOLOGY_TEXT);
    assert_eq!(
        assistant.youtube.as_deref(),
        Some("https://youtube.com/watch?v=abc")
    );
    assert_eq!(
        assistant.source_url.as_deref(),
        Some("https://example.com/source")
    );
}

#[tokio::test]
async fn test_webhook_failure_keeps_optimistic_message_without_rollback() {
    let webhook = FakeWebhook::with_text("unused");
    webhook.fail.store(true, Ordering::SeqCst);
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 5), webhook).await;
    let auth = ctx.auth.clone();
    let mut screen = ChatScreen::new(ctx);

    let err = screen.send_message("hello").await.unwrap_err();

    assert!(matches!(err, SendError::Delivery(_)));
    // Optimistic entry stays; the persisted user message is not rolled back.
    assert_eq!(screen.messages.len(), 1);
    assert_eq!(screen.messages[0].role, Role::User);
    assert_eq!(store.history_len(), 1);
    // No decrement happened.
    assert_eq!(auth.state().user.unwrap().tokens_day, 5);
    assert!(!screen.loading);
}

#[tokio::test]
async fn test_last_token_exchange_then_next_send_is_blocked() {
    let webhook = FakeWebhook::with_text("Photosynthesis converts light...");
    let (ctx, _store, _dir) = app_context_for(profile("u1", "Alice", 1), webhook.clone()).await;
    let auth = ctx.auth.clone();
    let mut screen = ChatScreen::new(ctx);

    screen.send_message("Explain photosynthesis").await.unwrap();
    assert_eq!(auth.state().user.unwrap().tokens_day, 0);

    let err = screen.send_message("And respiration?").await.unwrap_err();
    assert!(matches!(err, SendError::NoTokens));
    assert_eq!(webhook.call_count(), 1, "no second outbound call");
    assert_eq!(screen.messages.len(), 2, "no optimistic append when blocked");
}

#[tokio::test]
async fn test_persisted_history_round_trips_in_order() {
    let webhook = FakeWebhook::with_text("answer");
    let (ctx, _store, _dir) = app_context_for(profile("u1", "Alice", 4), webhook).await;
    let mut screen = ChatScreen::new(ctx.clone());

    screen.send_message("question").await.unwrap();
    let in_memory = screen.messages.clone();

    let mut reloaded = ChatScreen::new(ctx);
    reloaded.load_history().await;

    assert!(!reloaded.loading_history);
    assert_eq!(reloaded.messages, in_memory);
    assert_eq!(
        reloaded.messages.last(),
        in_memory.last(),
        "last appended message survives the round-trip on all fields"
    );
}

#[tokio::test]
async fn test_history_load_without_user_leaves_empty_list() {
    let webhook = FakeWebhook::with_text("unused");
    let (ctx, store, _dir) = app_context_for(profile("u1", "Alice", 4), webhook).await;
    // Simulate a signed-out history load: no user in state.
    ctx.auth.sign_out().await;
    let _ = store;
    let mut screen = ChatScreen::new(ctx);

    screen.load_history().await;

    assert!(screen.messages.is_empty());
    assert!(!screen.loading_history);
}
