//! Transport error types

use std::fmt;

/// Errors raised by a chat transport.
#[derive(Debug)]
pub enum TransportError {
    /// The HTTP request could not be completed
    Request(String),
    /// The platform rejected the call
    Api { code: Option<i64>, description: String },
    /// The platform answered with something we could not parse
    InvalidResponse(String),
    /// A downloaded file exceeded the size cap
    FileTooLarge { size: u64, max_size: u64 },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(msg) => write!(f, "Transport request failed: {}", msg),
            TransportError::Api {
                code: Some(code),
                description,
            } => write!(f, "Chat API error {}: {}", code, description),
            TransportError::Api {
                code: None,
                description,
            } => write!(f, "Chat API error: {}", description),
            TransportError::InvalidResponse(msg) => {
                write!(f, "Invalid chat API response: {}", msg)
            }
            TransportError::FileTooLarge { size, max_size } => write!(
                f,
                "File size {} bytes exceeds maximum {} bytes",
                size, max_size
            ),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::InvalidResponse(err.to_string())
        } else {
            // Request errors carry the URL, which embeds the bot token
            TransportError::Request(err.without_url().to_string())
        }
    }
}
