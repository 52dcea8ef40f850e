//! Row models for the configuration tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `webhooks` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Upsert payload for a webhook row, keyed by `name`.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookConfig {
    pub name: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// `credentials` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub send_to_chat_webhook: bool,
    #[serde(default)]
    pub send_to_payment_webhook: bool,
}

/// Category tag on a parameter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Api,
    Ads,
    Payment,
    Webhook,
    IframeUrl,
}

/// `parameters` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
}

/// Upsert payload for a parameter row, keyed by `name`.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterUpsert {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
}

/// Fold rows into the flat name/value maps the webhook payload carries.
pub fn fold_credentials(rows: &[CredentialRecord]) -> HashMap<String, String> {
    rows.iter()
        .map(|c| (c.name.clone(), c.value.clone()))
        .collect()
}

pub fn fold_parameters(rows: &[ParameterRecord]) -> HashMap<String, String> {
    rows.iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}
