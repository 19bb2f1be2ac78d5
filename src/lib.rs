pub mod services;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use crate::services::sender::{SendMode, Sender};
use crate::services::settings::{AppConfig, load_config};
use crate::services::telegram::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, RealTelegramApi};
use crate::traits::telegram_api::TelegramApi;

/// High-level entrypoint: load config, init logging, run one send
pub async fn run_with_config_path(path: &str, text: &str, mode: SendMode) -> std::io::Result<()> {
    // Load YAML config
    let cfg: AppConfig = load_config(path).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to load {}: {}", path, e),
        )
    })?;

    // Initialize structured logging (default to info if RUST_LOG not set)
    let log_spec = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_spec))
        .with_target(false)
        .compact()
        .try_init();

    run_send(cfg, text, mode).await
}

/// Builds the real api client and sender from config and performs one send.
/// The send is a single sequential pipeline; the exit status reflects its
/// outcome.
pub async fn run_send(cfg: AppConfig, text: &str, mode: SendMode) -> std::io::Result<()> {
    let base_url = cfg
        .telegram
        .api_base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let timeout = Duration::from_secs(
        cfg.telegram
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    );
    let api: Arc<dyn TelegramApi> = Arc::new(
        RealTelegramApi::new(base_url, cfg.telegram.bot_token.clone(), timeout)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?,
    );

    let sender = Sender::from_config(&cfg, api)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let outcome = sender.send_with_result(text, mode).await;
    if outcome.success {
        Ok(())
    } else {
        let message = outcome
            .error_message
            .unwrap_or_else(|| "send failed".to_string());
        Err(std::io::Error::new(std::io::ErrorKind::Other, message))
    }
}
