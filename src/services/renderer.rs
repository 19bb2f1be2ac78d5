//! Off-screen text rasterization.
//!
//! Renders typed text onto a flat-filled RGBA canvas and encodes the result
//! as PNG. Layout policy: input is split on `\n`, each line is greedily
//! word-wrapped to the canvas width (words wider than the canvas are broken
//! at glyph granularity), the wrapped block is centered both horizontally and
//! vertically, and lines falling past the bottom edge are clipped.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use derive_more::Display;
use image::{ImageBuffer, ImageFormat, Rgba};
use rusttype::{Font, Scale, point};
use tracing::debug;

/// A single rasterization job: what to draw and onto what canvas.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub text_color: Rgba<u8>,
    pub background_color: Rgba<u8>,
}

/// PNG bytes produced by a render plus the path they were persisted to.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub path: PathBuf,
}

#[derive(Debug, Display)]
pub enum RenderError {
    #[display("font error: {_0}")]
    Font(String),
    #[display("png encode error: {_0}")]
    Encode(String),
    #[display("io error: {_0}")]
    Io(std::io::Error),
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Parses `#RRGGBB` / `#RRGGBBAA` color literals (leading `#` optional).
pub fn parse_color(s: &str) -> Result<Rgba<u8>, String> {
    let digits = s.trim().trim_start_matches('#');
    let bytes = hex::decode(digits).map_err(|_| format!("invalid color literal: {s}"))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 255])),
        [r, g, b, a] => Ok(Rgba([*r, *g, *b, *a])),
        _ => Err(format!("invalid color literal: {s}")),
    }
}

/// Rasterizes text against a single loaded font.
pub struct TextImageRenderer {
    font: Font<'static>,
}

impl TextImageRenderer {
    /// Loads and parses the font file backing all renders of this instance.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` when the file cannot be read and
    /// `RenderError::Font` when it is not a parseable TrueType font.
    pub fn open<P: AsRef<Path>>(font_path: P) -> Result<Self, RenderError> {
        let bytes = fs::read(font_path.as_ref())?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            RenderError::Font(format!(
                "unparseable font file: {}",
                font_path.as_ref().display()
            ))
        })?;
        Ok(Self { font })
    }

    /// Fills the canvas with the background color, composites the centered
    /// text, encodes the result as PNG and writes it to `out_path`,
    /// overwriting any existing file there.
    pub fn render(&self, req: &RenderRequest, out_path: &Path) -> Result<RenderedImage, RenderError> {
        let mut canvas: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(req.width, req.height, req.background_color);

        let scale = Scale::uniform(req.font_size);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap).ceil();

        let lines = self.wrap_lines(&req.text, scale, req.width as f32);
        let block_height = lines.len() as f32 * line_height;
        let mut top = ((req.height as f32 - block_height) / 2.0).max(0.0);

        for line in &lines {
            if top >= req.height as f32 {
                break;
            }
            let width = self.line_width(line, scale);
            let x = ((req.width as f32 - width) / 2.0).max(0.0);
            self.draw_line(&mut canvas, line, scale, x, top, req.text_color);
            top += line_height;
        }

        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        fs::write(out_path, &png)?;
        debug!(path = %out_path.display(), bytes = png.len(), lines = lines.len(), "rendered text image");

        Ok(RenderedImage {
            png,
            path: out_path.to_path_buf(),
        })
    }

    /// Ink width of a laid-out line in pixels.
    fn line_width(&self, text: &str, scale: Scale) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let v_metrics = self.font.v_metrics(scale);
        let mut width: f32 = 0.0;
        for glyph in self.font.layout(text, scale, point(0.0, v_metrics.ascent)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                width = width.max(bb.max.x as f32);
            }
        }
        width
    }

    fn wrap_lines(&self, text: &str, scale: Scale, max_width: f32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for raw in text.split('\n') {
            let mut current = String::new();
            for word in raw.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.line_width(&candidate, scale) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.line_width(word, scale) <= max_width {
                    current = word.to_string();
                } else {
                    current = self.break_word(word, scale, max_width, &mut lines);
                }
            }
            // Blank input lines survive as blank output lines.
            lines.push(current);
        }
        lines
    }

    /// Splits a word wider than the canvas at glyph granularity. Full chunks
    /// go into `lines`; the unfinished tail is returned.
    fn break_word(
        &self,
        word: &str,
        scale: Scale,
        max_width: f32,
        lines: &mut Vec<String>,
    ) -> String {
        let mut piece = String::new();
        for ch in word.chars() {
            let mut candidate = piece.clone();
            candidate.push(ch);
            if !piece.is_empty() && self.line_width(&candidate, scale) > max_width {
                lines.push(std::mem::take(&mut piece));
                piece.push(ch);
            } else {
                piece = candidate;
            }
        }
        piece
    }

    fn draw_line(
        &self,
        canvas: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
        text: &str,
        scale: Scale,
        x: f32,
        top: f32,
        color: Rgba<u8>,
    ) {
        let v_metrics = self.font.v_metrics(scale);
        let baseline = top + v_metrics.ascent;
        for glyph in self.font.layout(text, scale, point(x, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px < 0 || py < 0 {
                        return;
                    }
                    let (px, py) = (px as u32, py as u32);
                    if px >= canvas.width() || py >= canvas.height() {
                        return;
                    }
                    let coverage = coverage.clamp(0.0, 1.0);
                    if coverage <= 0.0 {
                        return;
                    }
                    let dst = canvas.get_pixel_mut(px, py);
                    let inv = 1.0 - coverage;
                    for c in 0..3 {
                        dst.0[c] =
                            (color.0[c] as f32 * coverage + dst.0[c] as f32 * inv).round() as u8;
                    }
                    dst.0[3] = dst.0[3].max((color.0[3] as f32 * coverage).round() as u8);
                });
            }
        }
    }
}
