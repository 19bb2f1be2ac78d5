use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config file wired to the mock server. Bot token is always
/// `TEST`, chat id `42`.
pub fn render_config(
    base: &str,
    font_path: &str,
    out_dir: &str,
    text_color: &str,
    background_color: &str,
) -> tempfile::NamedTempFile {
    let yaml = format!(
        "telegram:
  api_base_url: \"{base}\"
  bot_token: \"TEST\"
  chat_id: \"42\"
  request_timeout_secs: 5
render:
  font_path: \"{font_path}\"
  font_size: 48.0
  text_color: \"{text_color}\"
  background_color: \"{background_color}\"
output:
  dir: \"{out_dir}\"
"
    );
    let tf = tempfile::NamedTempFile::new().unwrap();
    fs::write(tf.path(), yaml).unwrap();
    tf
}

pub async fn mount_send_message(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/botTEST/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_send_photo(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/botTEST/sendPhoto"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_send_sticker(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/botTEST/sendSticker"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(server)
        .await;
}

/// Telegram-shaped failure response for any endpoint.
pub async fn mount_error(server: &MockServer, endpoint: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(format!("/botTEST/{endpoint}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        ))
        .expect(1)
        .mount(server)
        .await;
}

/// Synthesizes a small valid PNG for transport tests that do not need a font.
pub fn write_test_png(path: &Path, edge: u32) {
    let img = RgbaImage::from_pixel(edge, edge, Rgba([255, 255, 255, 255]));
    img.save(path).unwrap();
}

/// Finds an installed TrueType font usable by the rasterizer. Tests that
/// need real glyph outlines skip with a notice when none is present.
pub fn find_test_font() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    for c in CANDIDATES {
        let p = PathBuf::from(c);
        if p.exists() {
            return Some(p);
        }
    }
    for root in ["/usr/share/fonts", "/usr/local/share/fonts"] {
        if let Some(found) = scan_for_ttf(Path::new(root)) {
            return Some(found);
        }
    }
    None
}

fn scan_for_ttf(dir: &Path) -> Option<PathBuf> {
    for entry in fs::read_dir(dir).ok()?.flatten() {
        let p = entry.path();
        if p.is_dir() {
            if let Some(found) = scan_for_ttf(&p) {
                return Some(found);
            }
        } else if p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
        {
            return Some(p);
        }
    }
    None
}

/// True when `needle` occurs anywhere in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
