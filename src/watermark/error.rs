//! Stamping failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    /// The embedded font failed to parse
    #[error("Watermark font unavailable: {0}")]
    Font(String),

    #[error("Cannot draw watermark text: {0}")]
    Render(String),

    /// Rejected stamp style or color
    #[error("Invalid watermark style: {0}")]
    Style(String),
}
