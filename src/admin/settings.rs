//! Admin settings load/save.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::backend::models::{ParameterKind, ParameterUpsert, WebhookConfig};
use crate::backend::RemoteStore;
use crate::chat::models::DEFAULT_WEBHOOK_URL;
use crate::common::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum SettingsSaveError {
    /// Inline form error; no upsert is issued while the headers text does not
    /// parse as a key-value JSON object.
    #[error("Invalid JSON in webhook headers")]
    InvalidHeaders,

    #[error("Failed to save settings")]
    Save(#[from] BackendError),
}

/// Form state for the admin settings screen.
#[derive(Debug, Clone)]
pub struct AdminSettingsForm {
    pub webhook_url: String,
    /// Free-text JSON; validated on save.
    pub webhook_headers: String,
    pub notchpay_public_key: String,
    pub notchpay_private_key: String,
    pub test_mode: bool,
    pub callback_url: String,
    pub webhook_secret: String,
    pub iframe_url: String,
}

impl Default for AdminSettingsForm {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            webhook_headers: "{}".to_string(),
            notchpay_public_key: String::new(),
            notchpay_private_key: String::new(),
            test_mode: true,
            callback_url: String::new(),
            webhook_secret: String::new(),
            iframe_url: String::new(),
        }
    }
}

impl AdminSettingsForm {
    /// Populate the form from the remote tables. Load failures are logged
    /// and leave the affected fields at their defaults.
    pub async fn load(store: &Arc<dyn RemoteStore>) -> Self {
        let mut form = Self::default();

        match store.fetch_webhook("chat_webhook").await {
            Ok(Some(webhook)) => {
                form.webhook_url = webhook.url;
                form.webhook_headers = serde_json::to_string_pretty(&webhook.headers)
                    .unwrap_or_else(|_| "{}".to_string());
            }
            Ok(None) => {}
            Err(e) => error!(error = %e, "Error loading webhook settings"),
        }

        match store.fetch_parameters().await {
            Ok(parameters) => {
                for param in parameters {
                    match param.name.as_str() {
                        "notchpay_public_key" => form.notchpay_public_key = param.value,
                        "notchpay_private_key" => form.notchpay_private_key = param.value,
                        "test_mode" => form.test_mode = param.value == "true",
                        "callback_url" => form.callback_url = param.value,
                        "webhook_secret" => form.webhook_secret = param.value,
                        "iframe_url" => form.iframe_url = param.value,
                        _ => {}
                    }
                }
            }
            Err(e) => error!(error = %e, "Error loading parameters"),
        }

        form
    }

    /// Parse the headers field. Only a JSON object with string values is
    /// accepted.
    pub fn parse_headers(&self) -> Result<HashMap<String, String>, SettingsSaveError> {
        let value: serde_json::Value = serde_json::from_str(&self.webhook_headers)
            .map_err(|_| SettingsSaveError::InvalidHeaders)?;
        let object = value.as_object().ok_or(SettingsSaveError::InvalidHeaders)?;

        let mut headers = HashMap::new();
        for (name, value) in object {
            let value = value.as_str().ok_or(SettingsSaveError::InvalidHeaders)?;
            headers.insert(name.clone(), value.to_string());
        }
        Ok(headers)
    }

    /// Validate, then upsert the webhook row and the six parameter rows.
    /// The headers check runs first: an invalid form issues zero upserts.
    pub async fn save(&self, store: &Arc<dyn RemoteStore>) -> Result<(), SettingsSaveError> {
        let headers = self.parse_headers()?;

        store
            .upsert_webhook(&WebhookConfig {
                name: "chat_webhook".to_string(),
                url: self.webhook_url.clone(),
                headers,
            })
            .await?;

        for param in self.parameter_upserts() {
            store.upsert_parameter(&param).await?;
        }

        info!("Admin settings saved");
        Ok(())
    }

    fn parameter_upserts(&self) -> Vec<ParameterUpsert> {
        vec![
            ParameterUpsert {
                name: "notchpay_public_key".to_string(),
                value: self.notchpay_public_key.clone(),
                kind: ParameterKind::Payment,
            },
            ParameterUpsert {
                name: "notchpay_private_key".to_string(),
                value: self.notchpay_private_key.clone(),
                kind: ParameterKind::Payment,
            },
            ParameterUpsert {
                name: "test_mode".to_string(),
                value: self.test_mode.to_string(),
                kind: ParameterKind::Payment,
            },
            ParameterUpsert {
                name: "callback_url".to_string(),
                value: self.callback_url.clone(),
                kind: ParameterKind::Payment,
            },
            ParameterUpsert {
                name: "webhook_secret".to_string(),
                value: self.webhook_secret.clone(),
                kind: ParameterKind::Payment,
            },
            ParameterUpsert {
                name: "iframe_url".to_string(),
                value: self.iframe_url.clone(),
                kind: ParameterKind::IframeUrl,
            },
        ]
    }
}
