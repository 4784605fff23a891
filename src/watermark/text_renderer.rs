//! Single-line text rendering with the embedded font.
//!
//! # Example
//!
//! ```ignore
//! use tracemark::watermark::text_renderer::{draw_text_centered, Color, TextRenderOptions};
//!
//! let options = TextRenderOptions {
//!     text: "alice".to_string(),
//!     font_size: 64.0,
//!     color: Color::white(),
//!     opacity: 1.0,
//! };
//!
//! draw_text_centered(&mut image, &options, 0, 0)?;
//! ```

use ab_glyph::{point, Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

use super::compositor::{blend_layer, over, Layer, Offset};
use super::WatermarkError;

/// DejaVu Sans (Bitstream Vera derived license).
const FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Added to measured boxes so antialiased edges are not cut off.
const PADDING: u32 = 2;

static FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

fn font() -> Result<&'static FontRef<'static>, WatermarkError> {
    FONT.get_or_init(|| FontRef::try_from_slice(FONT_DATA).ok())
        .as_ref()
        .ok_or_else(|| WatermarkError::Font("embedded font data is invalid".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Parse `#RGB` or `#RRGGBB`.
pub fn parse_hex_color(s: &str) -> Result<Color, WatermarkError> {
    let invalid = || WatermarkError::Style(format!("'{}' is not a #RGB or #RRGGBB color", s));

    let nibbles: Vec<u8> = s
        .strip_prefix('#')
        .ok_or_else(invalid)?
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;

    match nibbles[..] {
        [r, g, b] => Ok(Color::new(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Ok(Color::new(r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2)),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    pub text: String,
    /// Pixels per em
    pub font_size: f32,
    pub color: Color,
    /// 0.0 to 1.0
    pub opacity: f32,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 64.0,
            color: Color::white(),
            opacity: 1.0,
        }
    }
}

/// Glyphs of `text` with their kerned pen positions, and the total advance.
fn layout(font: &FontRef<'static>, scale: PxScale, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(scale);
    let mut pen = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    let glyphs = text
        .chars()
        .map(|c| {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                pen += scaled.kern(prev, id);
            }
            let at = pen;
            pen += scaled.h_advance(id);
            previous = Some(id);
            (id, at)
        })
        .collect();

    (glyphs, pen)
}

/// `(width, height)` of a rendered line.
///
/// Height is the font's line height, so every string at a given size
/// measures the same height.
pub fn measure_text(text: &str, font_size: f32) -> Result<(u32, u32), WatermarkError> {
    let font = font()?;
    let scale = PxScale::from(font_size);
    let (_, advance) = layout(font, scale, text);
    let height = font.as_scaled(scale).height();

    Ok((advance.ceil() as u32 + PADDING, height.ceil() as u32 + PADDING))
}

/// Render a line onto a transparent canvas sized by [`measure_text`].
pub fn render_text(options: &TextRenderOptions) -> Result<RgbaImage, WatermarkError> {
    if options.text.is_empty() {
        return Err(WatermarkError::Render("text is empty".to_string()));
    }
    if !(options.font_size > 0.0) {
        return Err(WatermarkError::Render(format!(
            "font size must be positive, got {}",
            options.font_size
        )));
    }

    let font = font()?;
    let scale = PxScale::from(options.font_size);
    let (width, height) = measure_text(&options.text, options.font_size)?;
    let mut canvas = RgbaImage::new(width.max(1), height.max(1));

    let alpha = options.opacity.clamp(0.0, 1.0) * 255.0;
    let baseline = font.as_scaled(scale).ascent();
    let (glyphs, _) = layout(font, scale, &options.text);

    for (id, x) in glyphs {
        let Some(outline) = font.outline_glyph(id.with_scale_and_position(scale, point(x, baseline)))
        else {
            continue;
        };
        let bounds = outline.px_bounds();

        outline.draw(|gx, gy, coverage| {
            let x = i64::from(gx) + bounds.min.x as i64;
            let y = i64::from(gy) + bounds.min.y as i64;
            if (0..i64::from(canvas.width())).contains(&x)
                && (0..i64::from(canvas.height())).contains(&y)
            {
                // Overlapping glyph edges accumulate coverage
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                *pixel = over(*pixel, options.color.with_alpha((coverage * alpha) as u8), 1.0);
            }
        });
    }

    Ok(canvas)
}

/// Draw a line centered on `target`, shifted by `(dx, dy)`.
///
/// The centering box is always the full target, so two calls with the same
/// text and size overlap exactly apart from their shifts.
pub fn draw_text_centered(
    target: &mut RgbaImage,
    options: &TextRenderOptions,
    dx: i32,
    dy: i32,
) -> Result<(), WatermarkError> {
    let text = render_text(options)?;
    let offset = Offset::new(
        (target.width() as i32 - text.width() as i32) / 2 + dx,
        (target.height() as i32 - text.height() as i32) / 2 + dy,
    );

    blend_layer(
        target,
        &Layer {
            pixels: &text,
            offset,
            opacity: 1.0,
        },
    );
    Ok(())
}
