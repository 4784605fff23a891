// Error types module

use thiserror::Error;

use crate::imaging::ImageError;
use crate::transport::TransportError;
use crate::watermark::WatermarkError;

/// Failure of a bot operation.
///
/// Authorization denial and unknown photo ids are not errors; they are
/// reported through the outcome types of the publish and delivery flows.
/// Everything here is surfaced to the initiating actor as a failed operation.
#[derive(Error, Debug)]
pub enum BotError {
    /// The chat platform could not fetch, send, edit or delete
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Decoding, downsampling or encoding failed
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Rendering the identity stamp failed
    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    /// Configuration errors (invalid YAML, missing env vars, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The event lacked something the operation requires
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

impl From<tokio::task::JoinError> for BotError {
    fn from(err: tokio::task::JoinError) -> Self {
        BotError::Image(ImageError::from(err))
    }
}
