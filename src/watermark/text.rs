//! Watermark text derived from the requester.

use crate::identity::Identity;

/// Lines stamped onto a delivered copy. Recomputed for every delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkText {
    /// Display name if present, else the numeric handle.
    pub primary: String,
    /// Numeric handle, only when the primary line is a display name.
    pub secondary: Option<String>,
}

impl WatermarkText {
    pub fn for_identity(identity: &Identity) -> Self {
        let handle = identity.handle.to_string();
        match identity.display_name() {
            Some(name) => Self {
                primary: name.to_string(),
                secondary: Some(handle),
            },
            None => Self {
                primary: handle,
                secondary: None,
            },
        }
    }
}
