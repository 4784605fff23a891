//! Chat transport capability.
//!
//! The core never talks to the chat platform directly. It consumes the
//! [`ChatTransport`] trait: fetch bytes by opaque file reference, send and
//! edit messages and photos, delete messages. [`telegram::TelegramClient`]
//! implements it over the Telegram Bot API.

pub mod error;
pub mod telegram;
#[cfg(test)]
pub mod testing;
pub mod wire;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub use error::TransportError;
pub use telegram::TelegramClient;

/// Destination chat: numeric id or public `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Username(s.to_string()),
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => f.write_str(name),
        }
    }
}

impl Serialize for ChatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChatId::Id(id) => serializer.serialize_i64(*id),
            ChatId::Username(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChatIdVisitor;

        impl<'de> Visitor<'de> for ChatIdVisitor {
            type Value = ChatId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer chat id or an @username")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ChatId::Id(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(ChatId::Id)
                    .map_err(|_| E::custom(format!("chat id {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v.trim().is_empty() {
                    return Err(E::custom("chat id cannot be empty"));
                }
                Ok(ChatId::from(v))
            }
        }

        deserializer.deserialize_any(ChatIdVisitor)
    }
}

/// A message already delivered to a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// One quality variant of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    /// Reference usable to download or re-send the bytes.
    pub file_id: String,
    /// Content-stable identifier, identical across bots and re-sends.
    pub unique_id: String,
    pub width: u32,
    pub height: u32,
}

impl PhotoVariant {
    fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Highest-quality variant (largest area; later entries win ties).
pub fn largest_variant(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants
        .iter()
        .enumerate()
        .max_by_key(|(idx, v)| (v.area(), *idx))
        .map(|(_, v)| v)
}

/// A message carrying interactive controls, as seen when a button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    pub location: MessageRef,
    pub caption: Option<String>,
    pub photo: Vec<PhotoVariant>,
}

impl ControlMessage {
    pub fn chat(&self) -> ChatId {
        ChatId::Id(self.location.chat_id)
    }

    pub fn largest_photo(&self) -> Option<&PhotoVariant> {
        largest_variant(&self.photo)
    }
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: data.into(),
        }
    }
}

/// Inline keyboard attached below a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Keyboard with a single row.
    pub fn row(buttons: Vec<InlineButton>) -> Self {
        Self {
            inline_keyboard: vec![buttons],
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.inline_keyboard.iter().flatten()
    }
}

/// Photo payload of an outgoing message.
#[derive(Debug, Clone)]
pub enum PhotoSource {
    /// Re-send a photo the platform already stores.
    Existing(String),
    /// Upload new bytes.
    Upload {
        data: Bytes,
        file_name: String,
        content_type: &'static str,
    },
}

/// Transient status shown to the recipient while work is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    UploadPhoto,
}

impl ChatAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatAction::UploadPhoto => "upload_photo",
        }
    }
}

/// A message the transport has sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub location: MessageRef,
    pub photo: Vec<PhotoVariant>,
}

/// Capabilities the bot needs from the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Download the bytes behind an opaque file reference.
    async fn fetch_file(&self, file_id: &str) -> Result<Bytes, TransportError>;

    async fn send_message(&self, chat: &ChatId, text: &str) -> Result<SentMessage, TransportError>;

    async fn send_photo(
        &self,
        chat: &ChatId,
        photo: PhotoSource,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError>;

    /// Replace the caption (and keyboard) of an existing message in place.
    async fn edit_caption(
        &self,
        message: MessageRef,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError>;

    async fn send_chat_action(&self, chat: &ChatId, action: ChatAction)
        -> Result<(), TransportError>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError>;
}
