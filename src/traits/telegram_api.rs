use async_trait::async_trait;
use std::path::Path;

/// Telegram distinguishes photo and sticker uploads by Bot API method and by
/// the name of the multipart field carrying the binary. The canvas edge is
/// the size the API expects for each kind (stickers are 512x512).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Photo,
    Sticker,
}

impl FileKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            FileKind::Photo => "sendPhoto",
            FileKind::Sticker => "sendSticker",
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FileKind::Photo => "photo",
            FileKind::Sticker => "sticker",
        }
    }

    /// Fixed output file name; a new render overwrites the previous one.
    pub fn file_name(&self) -> &'static str {
        match self {
            FileKind::Photo => "image.png",
            FileKind::Sticker => "sticker.png",
        }
    }

    pub fn canvas_edge(&self) -> u32 {
        match self {
            FileKind::Photo => 256,
            FileKind::Sticker => 512,
        }
    }
}

/// `TelegramApi` defines an interface for delivering content via the Telegram Bot API.
///
/// This trait allows different implementations, including mock implementations for testing
/// and real ones that send actual HTTP requests.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Sends a text message to a specified Telegram chat.
    async fn send_telegram_message(&self, chat_id: &str, text: String) -> Result<(), String>;

    /// Uploads the file at `file_path` to a specified Telegram chat, as a
    /// photo or a sticker depending on `kind`. Single attempt, no retry.
    async fn send_telegram_file(
        &self,
        chat_id: &str,
        kind: FileKind,
        file_path: &Path,
    ) -> Result<(), String>;
}
