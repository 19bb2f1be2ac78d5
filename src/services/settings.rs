use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub render: RenderConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub api_base_url: Option<String>,     // default https://api.telegram.org
    pub bot_token: String,
    pub chat_id: String,                  // numeric id or @channel handle
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    pub font_path: String,                // .ttf with TrueType outlines
    pub font_size: Option<f32>,
    pub text_color: String,               // "#RRGGBB" or "#RRGGBBAA"
    pub background_color: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub dir: Option<String>,              // default: OS temp dir
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, Box<dyn std::error::Error + Send + Sync>> {
    let content = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}
