//! Telegram Bot API wire types.
//!
//! Only the fields the bot reads are modelled; unknown fields are ignored.

use serde::Deserialize;

use super::{ControlMessage, MessageRef, PhotoVariant, SentMessage};
use crate::identity::Identity;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

impl User {
    pub fn identity(&self) -> Identity {
        let identity = Identity::new(self.id);
        match &self.username {
            Some(name) => identity.with_display_name(name.clone()),
            None => identity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
}

impl From<PhotoSize> for PhotoVariant {
    fn from(size: PhotoSize) -> Self {
        PhotoVariant {
            file_id: size.file_id,
            unique_id: size.file_unique_id,
            width: size.width,
            height: size.height,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photo: Option<Vec<PhotoSize>>,
    pub video: Option<serde_json::Value>,
    pub animation: Option<serde_json::Value>,
}

impl Message {
    pub fn location(&self) -> MessageRef {
        MessageRef {
            chat_id: self.chat.id,
            message_id: self.message_id,
        }
    }

    pub fn photo_variants(&self) -> Vec<PhotoVariant> {
        self.photo
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(PhotoVariant::from)
            .collect()
    }

    pub fn into_control(self) -> ControlMessage {
        ControlMessage {
            location: self.location(),
            photo: self.photo_variants(),
            caption: self.caption,
        }
    }

    pub fn into_sent(self) -> SentMessage {
        SentMessage {
            location: self.location(),
            photo: self.photo_variants(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
}
