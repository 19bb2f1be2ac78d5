use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use crate::traits::telegram_api::{FileKind, TelegramApi};

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A real implementation of the `TelegramApi` trait that sends HTTP requests to the Telegram Bot API.
#[derive(Builder)]
pub struct RealTelegramApi {
    pub client: Client,
    pub base_url: String,
    pub token: String,
}

impl RealTelegramApi {
    /// Creates an api client for the given base URL and bot token. The
    /// timeout bounds each whole request; a request that fails or times out
    /// is not retried.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build http client: {e}"))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    // The token is embedded in every URL, so the URL itself never goes to logs.
    fn endpoint_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

/// Telegram wraps failures in a JSON body with a `description` field; fall
/// back to the raw body when it is anything else.
fn api_error(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("description").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string());
    format!("Telegram API error {status}: {detail}")
}

#[async_trait]
impl TelegramApi for RealTelegramApi {
    /// Sends a message to a Telegram chat using the Telegram Bot API.
    ///
    /// # Arguments
    ///
    /// * `chat_id` - Telegram chat ID to send the message to.
    /// * `text` - Message text to send.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or `Err(String)` with an error message on failure.
    async fn send_telegram_message(&self, chat_id: &str, text: String) -> Result<(), String> {
        let url = self.endpoint_url("sendMessage");
        info!(chat_id = %chat_id, text_len = text.len(), "telegram: sendMessage");

        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", chat_id), ("text", text.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error sending Telegram message");
                format!("HTTP error: {}", e)
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "telegram: sendMessage failed");
            Err(api_error(status, &body))
        }
    }

    /// Uploads a file as a photo or sticker. The file is read fully into
    /// memory and shipped as one `multipart/form-data` POST.
    async fn send_telegram_file(
        &self,
        chat_id: &str,
        kind: FileKind,
        file_path: &Path,
    ) -> Result<(), String> {
        let url = self.endpoint_url(kind.endpoint());
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| format!("failed to read {}: {}", file_path.display(), e))?;
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(kind.file_name())
            .to_string();
        info!(
            chat_id = %chat_id,
            endpoint = kind.endpoint(),
            bytes = bytes.len(),
            file = %file_name,
            "telegram: upload"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|e| format!("multipart error: {e}"))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part(kind.field_name(), part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = kind.endpoint(), "HTTP error uploading Telegram file");
                format!("HTTP error: {}", e)
            })?;

        if response.status().is_success() {
            info!(endpoint = kind.endpoint(), "telegram: upload ok");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, endpoint = kind.endpoint(), "telegram: upload failed");
            Err(api_error(status, &body))
        }
    }
}
