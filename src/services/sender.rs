//! One send operation end to end: validate the input, render the canvas for
//! image kinds, then hand the result to the Telegram api. Each call is
//! self-contained; nothing is shared across concurrent sends except the
//! destination file path, where the last writer wins.

use std::path::PathBuf;
use std::sync::Arc;

use derive_more::Display;
use image::Rgba;
use tracing::{error, info};

use crate::services::renderer::{RenderError, RenderRequest, TextImageRenderer, parse_color};
use crate::services::settings::AppConfig;
use crate::traits::telegram_api::{FileKind, TelegramApi};

pub const DEFAULT_FONT_SIZE: f32 = 48.0;

/// How a piece of typed text leaves for Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, clap::ValueEnum)]
pub enum SendMode {
    /// Render to a 256x256 PNG and upload via `sendPhoto`.
    #[display("photo")]
    Photo,
    /// Render to a 512x512 PNG and upload via `sendSticker`.
    #[display("sticker")]
    Sticker,
    /// Deliver the raw text via `sendMessage`, no rendering involved.
    #[display("message")]
    Message,
}

#[derive(Debug, Display)]
pub enum SendError {
    #[display("validation error: {_0}")]
    Validation(String),
    #[display("render error: {_0}")]
    Render(RenderError),
    #[display("transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for SendError {}

impl From<RenderError> for SendError {
    fn from(e: RenderError) -> Self {
        SendError::Render(e)
    }
}

/// Outcome of a single send in caller-facing form. Transient; nothing about
/// a send survives the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl UploadResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

/// Drives validate -> render -> upload for one piece of typed text.
pub struct Sender {
    api: Arc<dyn TelegramApi>,
    chat_id: String,
    font_path: PathBuf,
    font_size: f32,
    text_color: Rgba<u8>,
    background_color: Rgba<u8>,
    output_dir: PathBuf,
}

impl Sender {
    /// Builds a sender from the loaded config. Rejects empty credentials and
    /// color pairs that would render text invisibly (text == background)
    /// before any render or request happens.
    pub fn from_config(cfg: &AppConfig, api: Arc<dyn TelegramApi>) -> Result<Self, SendError> {
        if cfg.telegram.bot_token.trim().is_empty() {
            return Err(SendError::Validation(
                "telegram.bot_token must not be empty".into(),
            ));
        }
        if cfg.telegram.chat_id.trim().is_empty() {
            return Err(SendError::Validation(
                "telegram.chat_id must not be empty".into(),
            ));
        }
        let text_color = parse_color(&cfg.render.text_color).map_err(SendError::Validation)?;
        let background_color =
            parse_color(&cfg.render.background_color).map_err(SendError::Validation)?;
        if text_color == background_color {
            return Err(SendError::Validation(
                "text_color and background_color must differ".into(),
            ));
        }
        let output_dir = cfg
            .output
            .as_ref()
            .and_then(|o| o.dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            api,
            chat_id: cfg.telegram.chat_id.clone(),
            font_path: PathBuf::from(&cfg.render.font_path),
            font_size: cfg.render.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            text_color,
            background_color,
            output_dir,
        })
    }

    /// Runs one send. Single attempt throughout: a failure at any stage is
    /// terminal for the call and nothing is rolled back or retried.
    pub async fn send(&self, text: &str, mode: SendMode) -> Result<(), SendError> {
        if text.trim().is_empty() {
            return Err(SendError::Validation("text must not be empty".into()));
        }
        match mode {
            SendMode::Message => self
                .api
                .send_telegram_message(&self.chat_id, text.to_string())
                .await
                .map_err(SendError::Transport),
            SendMode::Photo => self.send_file(text, FileKind::Photo).await,
            SendMode::Sticker => self.send_file(text, FileKind::Sticker).await,
        }
    }

    /// Same pipeline, reported as the result object instead of an error.
    pub async fn send_with_result(&self, text: &str, mode: SendMode) -> UploadResult {
        match self.send(text, mode).await {
            Ok(()) => {
                info!(mode = %mode, "send completed");
                UploadResult::ok()
            }
            Err(e) => {
                error!(mode = %mode, error = %e, "send failed");
                UploadResult::failed(e.to_string())
            }
        }
    }

    async fn send_file(&self, text: &str, kind: FileKind) -> Result<(), SendError> {
        let renderer = TextImageRenderer::open(&self.font_path)?;
        let edge = kind.canvas_edge();
        let request = RenderRequest {
            text: text.to_string(),
            width: edge,
            height: edge,
            font_size: self.font_size,
            text_color: self.text_color,
            background_color: self.background_color,
        };
        let out_path = self.output_dir.join(kind.file_name());
        let rendered = renderer.render(&request, &out_path)?;
        info!(path = %rendered.path.display(), bytes = rendered.png.len(), "rendered text image");

        self.api
            .send_telegram_file(&self.chat_id, kind, &rendered.path)
            .await
            .map_err(SendError::Transport)
    }
}
