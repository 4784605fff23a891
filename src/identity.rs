//! Chat principals.
//!
//! An [`Identity`] is the only thing the core knows about a user: the numeric
//! handle used for admission checks and private delivery, and an optional
//! display name used as watermark text.

use std::fmt;

/// Numeric user handle as assigned by the chat platform.
pub type Handle = i64;

/// A user acting on the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Mandatory numeric handle.
    pub handle: Handle,
    /// Optional public display name (`@username` without the `@`).
    pub display_name: Option<String>,
}

impl Identity {
    /// Identity without a display name.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            display_name: None,
        }
    }

    /// Attach a display name. Blank names are treated as absent.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// Display name if present and non-blank.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name() {
            Some(name) => write!(f, "{} ({})", name, self.handle),
            None => write!(f, "{}", self.handle),
        }
    }
}
