//! Inbound event classification.
//!
//! Raw updates are mapped once into a closed set of events; the dispatcher
//! matches on the variant and never inspects wire fields again.

use crate::callback::CallbackAction;
use crate::config::Messages;
use crate::identity::Identity;
use crate::transport::wire::{Message, Update};
use crate::transport::{ChatId, ControlMessage, MessageRef, PhotoVariant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A photo sent to the bot, awaiting publish/delete.
    Submission {
        message: MessageRef,
        caption: Option<String>,
        photo: Vec<PhotoVariant>,
    },
    /// /start, /help or a greeting keyword.
    Help { chat: ChatId },
    /// Video or animation; only stills are supported.
    UnsupportedMedia { chat: ChatId },
    /// Any other text.
    TextWithoutPhoto { chat: ChatId },
    /// A button press.
    Action {
        callback_id: String,
        actor: Identity,
        /// `None` for payloads this bot never issued
        action: Option<CallbackAction>,
        /// The message the button is attached to, when still accessible
        control: Option<ControlMessage>,
    },
    /// Service messages and update kinds the bot does not handle.
    Ignored,
}

fn is_help_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    // Commands may be addressed as /help@bot_name
    let command = command.split('@').next().unwrap_or_default();
    matches!(command, "/start" | "/help")
}

fn classify_message(message: Message, messages: &Messages) -> Event {
    let chat = ChatId::Id(message.chat.id);

    if message.photo.as_ref().is_some_and(|p| !p.is_empty()) {
        return Event::Submission {
            message: message.location(),
            photo: message.photo_variants(),
            caption: message.caption,
        };
    }
    if message.video.is_some() || message.animation.is_some() {
        return Event::UnsupportedMedia { chat };
    }

    match message.text.as_deref() {
        Some(text) if is_help_command(text) || messages.is_help_keyword(text) => {
            Event::Help { chat }
        }
        Some(_) => Event::TextWithoutPhoto { chat },
        None => Event::Ignored,
    }
}

impl Event {
    pub fn classify(update: Update, messages: &Messages) -> Self {
        if let Some(query) = update.callback_query {
            return Event::Action {
                callback_id: query.id,
                actor: query.from.identity(),
                action: query.data.as_deref().and_then(CallbackAction::parse),
                control: query.message.map(Message::into_control),
            };
        }

        match update.message {
            Some(message) => classify_message(message, messages),
            None => Event::Ignored,
        }
    }

    /// Chat that should hear about a failure while handling this event.
    ///
    /// Delivery requests are answered privately, never in the channel the
    /// button lives in.
    pub fn reply_chat(&self) -> Option<ChatId> {
        match self {
            Event::Submission { message, .. } => Some(ChatId::Id(message.chat_id)),
            Event::Help { chat }
            | Event::UnsupportedMedia { chat }
            | Event::TextWithoutPhoto { chat } => Some(chat.clone()),
            Event::Action {
                actor,
                action: Some(CallbackAction::GetPhoto(_)),
                ..
            } => Some(ChatId::Id(actor.handle)),
            Event::Action { actor, control, .. } => Some(
                control
                    .as_ref()
                    .map(ControlMessage::chat)
                    .unwrap_or(ChatId::Id(actor.handle)),
            ),
            Event::Ignored => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Submission { .. } => "submission",
            Event::Help { .. } => "help",
            Event::UnsupportedMedia { .. } => "unsupported_media",
            Event::TextWithoutPhoto { .. } => "text",
            Event::Action { .. } => "action",
            Event::Ignored => "ignored",
        }
    }
}
