//! Interactive control payloads.
//!
//! Buttons carry a short string payload. Publish and delete carry no argument
//! (they act on the message they are attached to); the delivery request
//! carries `photo_id:<public id>` verbatim.

use crate::constants::{DELETE_ACTION, PHOTO_ID_PREFIX, PUBLISH_ACTION};
use crate::registry::PublicId;

/// Decoded button action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Publish,
    Delete,
    GetPhoto(PublicId),
}

impl CallbackAction {
    /// Decode a payload. Unknown payloads yield `None`.
    ///
    /// The id after the prefix is taken verbatim, including an empty one;
    /// an id that was never registered is handled downstream as unavailable.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            PUBLISH_ACTION => Some(Self::Publish),
            DELETE_ACTION => Some(Self::Delete),
            other => other
                .strip_prefix(PHOTO_ID_PREFIX)
                .map(|id| Self::GetPhoto(PublicId::from(id))),
        }
    }

    /// Encode to the wire payload.
    pub fn to_data(&self) -> String {
        match self {
            Self::Publish => PUBLISH_ACTION.to_string(),
            Self::Delete => DELETE_ACTION.to_string(),
            Self::GetPhoto(id) => format!("{}{}", PHOTO_ID_PREFIX, id),
        }
    }
}
