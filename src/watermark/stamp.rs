//! Identity stamping pipeline.
//!
//! Delivery personalizes a photo in ordered stages, each consuming and
//! producing an owned buffer:
//!
//! 1. [`duplicate`] - split into a pristine base and an overlay working copy
//! 2. [`render_shadowed_line`] - primary line (dark pass at +offset, light pass at origin)
//! 3. [`render_shadowed_line`] - optional secondary line below, smaller size
//! 4. [`fade`] - draw the pristine copy back over the overlay at partial opacity
//!
//! The dark/light double pass keeps the text legible on both light and dark
//! backgrounds. Fading with the pristine copy on top leaves the text visible
//! but translucent.

use image::RgbaImage;

use super::compositor::{blend_layer, Layer, Offset};
use super::text::WatermarkText;
use super::text_renderer::{draw_text_centered, measure_text, Color, TextRenderOptions};
use super::WatermarkError;
use crate::constants::{
    DEFAULT_PRIMARY_FONT_SIZE, DEFAULT_PRISTINE_OPACITY, DEFAULT_SECONDARY_FONT_SIZE,
    DEFAULT_SECONDARY_LINE_DIVISOR, DEFAULT_SHADOW_OFFSET,
};

/// Visual parameters of the stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StampStyle {
    pub primary_font_size: f32,
    pub secondary_font_size: f32,
    pub dark: Color,
    pub light: Color,
    /// Shadow displacement, down and right, in pixels.
    pub shadow_offset: i32,
    /// Secondary line offset is `primary line height / divisor`.
    pub secondary_line_divisor: f32,
    /// Opacity of the pristine copy drawn over the stamped one.
    pub pristine_opacity: f32,
}

impl Default for StampStyle {
    fn default() -> Self {
        Self {
            primary_font_size: DEFAULT_PRIMARY_FONT_SIZE,
            secondary_font_size: DEFAULT_SECONDARY_FONT_SIZE,
            dark: Color::black(),
            light: Color::white(),
            shadow_offset: DEFAULT_SHADOW_OFFSET,
            secondary_line_divisor: DEFAULT_SECONDARY_LINE_DIVISOR,
            pristine_opacity: DEFAULT_PRISTINE_OPACITY,
        }
    }
}

impl StampStyle {
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if !(self.primary_font_size > 0.0) || !(self.secondary_font_size > 0.0) {
            return Err(WatermarkError::Style(
                "font sizes must be positive".to_string(),
            ));
        }
        if !(self.secondary_line_divisor > 0.0) {
            return Err(WatermarkError::Style(
                "secondary_line_divisor must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.pristine_opacity) {
            return Err(WatermarkError::Style(format!(
                "pristine_opacity must be within 0.0..=1.0, got {}",
                self.pristine_opacity
            )));
        }
        Ok(())
    }
}

/// Stage 1: returns `(pristine, overlay)`.
pub fn duplicate(image: RgbaImage) -> (RgbaImage, RgbaImage) {
    let overlay = image.clone();
    (image, overlay)
}

/// Stage 2/3: draw one centered line twice, dark then light.
///
/// `offset_y` moves the whole line (both passes) below center.
pub fn render_shadowed_line(
    mut overlay: RgbaImage,
    text: &str,
    font_size: f32,
    offset_y: i32,
    style: &StampStyle,
) -> Result<RgbaImage, WatermarkError> {
    let dark = TextRenderOptions {
        text: text.to_string(),
        font_size,
        color: style.dark,
        opacity: 1.0,
    };
    let light = TextRenderOptions {
        color: style.light,
        ..dark.clone()
    };

    draw_text_centered(
        &mut overlay,
        &dark,
        style.shadow_offset,
        offset_y + style.shadow_offset,
    )?;
    draw_text_centered(&mut overlay, &light, 0, offset_y)?;

    Ok(overlay)
}

/// Stage 4: composite the pristine copy over the overlay.
pub fn fade(mut overlay: RgbaImage, pristine: RgbaImage, opacity: f32) -> RgbaImage {
    blend_layer(
        &mut overlay,
        &Layer {
            pixels: &pristine,
            offset: Offset::ORIGIN,
            opacity,
        },
    );
    overlay
}

/// Vertical offset of the secondary line below the primary one.
pub fn secondary_line_offset(primary: &str, style: &StampStyle) -> Result<i32, WatermarkError> {
    let (_, line_height) = measure_text(primary, style.primary_font_size)?;
    Ok((line_height as f32 / style.secondary_line_divisor).round() as i32)
}

/// Run the full pipeline.
pub fn stamp(
    image: RgbaImage,
    text: &WatermarkText,
    style: &StampStyle,
) -> Result<RgbaImage, WatermarkError> {
    let (pristine, overlay) = duplicate(image);

    let mut overlay =
        render_shadowed_line(overlay, &text.primary, style.primary_font_size, 0, style)?;

    if let Some(secondary) = &text.secondary {
        let offset = secondary_line_offset(&text.primary, style)?;
        overlay = render_shadowed_line(
            overlay,
            secondary,
            style.secondary_font_size,
            offset,
            style,
        )?;
    }

    Ok(fade(overlay, pristine, style.pristine_opacity))
}
