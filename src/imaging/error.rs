//! Photo processing failures.

use std::fmt::Display;
use thiserror::Error;

use super::format::OutputFormat;

#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("Photo could not be decoded: {reason}")]
    Undecodable { reason: String },

    #[error("Photo could not be encoded as {format}: {reason}")]
    Unencodable { format: &'static str, reason: String },

    /// Rejected from the header alone; no pixel buffer was allocated
    #[error("Photo is {width}x{height}, over the {max_pixels} pixel limit")]
    TooManyPixels {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("Photo is {size} bytes, over the {max_size} byte limit")]
    TooLarge { size: usize, max_size: usize },

    /// The blocking worker panicked or was cancelled
    #[error("Image worker failed: {0}")]
    Worker(String),
}

impl ImageError {
    pub fn undecodable(err: impl Display) -> Self {
        ImageError::Undecodable {
            reason: err.to_string(),
        }
    }

    pub fn unencodable(format: OutputFormat, err: impl Display) -> Self {
        ImageError::Unencodable {
            format: format.as_str(),
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ImageError {
    fn from(err: tokio::task::JoinError) -> Self {
        ImageError::Worker(err.to_string())
    }
}
