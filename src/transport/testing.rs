//! In-memory transport for unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use super::{
    ChatAction, ChatId, ChatTransport, InlineKeyboard, MessageRef, PhotoSource, PhotoVariant,
    SentMessage, TransportError,
};

/// One recorded transport call.
#[derive(Debug, Clone)]
pub enum Call {
    FetchFile(String),
    SendMessage {
        chat: ChatId,
        text: String,
    },
    SendPhoto {
        chat: ChatId,
        photo: PhotoSource,
        caption: String,
        keyboard: Option<InlineKeyboard>,
    },
    EditCaption {
        message: MessageRef,
        caption: String,
        keyboard: Option<InlineKeyboard>,
    },
    DeleteMessage(MessageRef),
    ChatAction {
        chat: ChatId,
        action: ChatAction,
    },
    AnswerCallback {
        callback_id: String,
        text: Option<String>,
    },
}

type FetchHook = Box<dyn Fn(&str) + Send + Sync>;

/// Records every call; serves files from a map; fails on request.
#[derive(Default)]
pub struct RecordingTransport {
    files: Mutex<HashMap<String, Bytes>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<&'static str>>,
    fetch_hook: Mutex<Option<FetchHook>>,
    next_message_id: AtomicI64,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub fn with_file(self, file_id: &str, data: impl Into<Bytes>) -> Self {
        self.files.lock().insert(file_id.to_string(), data.into());
        self
    }

    /// Make every call of `method` (e.g. `"send_photo"`) fail.
    pub fn fail_on(&self, method: &'static str) {
        self.failing.lock().insert(method);
    }

    /// Run `hook` inside `fetch_file`, after lookup but before returning.
    pub fn on_fetch(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.fetch_hook.lock() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn sent_photos(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SendPhoto { .. }))
            .collect()
    }

    pub fn sent_texts(&self) -> Vec<(ChatId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendMessage { chat, text } => Some((chat, text)),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteMessage(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn record(&self, method: &'static str, call: Call) -> Result<(), TransportError> {
        self.calls.lock().push(call);
        if self.failing.lock().contains(method) {
            return Err(TransportError::Api {
                code: Some(400),
                description: format!("{} failed", method),
            });
        }
        Ok(())
    }

    fn sent(&self, chat: &ChatId, photo: Vec<PhotoVariant>) -> SentMessage {
        let chat_id = match chat {
            ChatId::Id(id) => *id,
            ChatId::Username(_) => -1,
        };
        SentMessage {
            location: MessageRef {
                chat_id,
                message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            },
            photo,
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn fetch_file(&self, file_id: &str) -> Result<Bytes, TransportError> {
        self.record("fetch_file", Call::FetchFile(file_id.to_string()))?;
        let data = self.files.lock().get(file_id).cloned().ok_or_else(|| TransportError::Api {
            code: Some(400),
            description: "Bad Request: invalid file_id".to_string(),
        })?;
        if let Some(hook) = self.fetch_hook.lock().as_ref() {
            hook(file_id);
        }
        Ok(data)
    }

    async fn send_message(&self, chat: &ChatId, text: &str) -> Result<SentMessage, TransportError> {
        self.record(
            "send_message",
            Call::SendMessage {
                chat: chat.clone(),
                text: text.to_string(),
            },
        )?;
        Ok(self.sent(chat, Vec::new()))
    }

    async fn send_photo(
        &self,
        chat: &ChatId,
        photo: PhotoSource,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        self.record(
            "send_photo",
            Call::SendPhoto {
                chat: chat.clone(),
                photo: photo.clone(),
                caption: caption.to_string(),
                keyboard: keyboard.cloned(),
            },
        )?;
        let file_id = match photo {
            PhotoSource::Existing(file_id) => file_id,
            PhotoSource::Upload { .. } => "uploaded".to_string(),
        };
        let variant = PhotoVariant {
            unique_id: format!("u-{}", file_id),
            file_id,
            width: 1,
            height: 1,
        };
        Ok(self.sent(chat, vec![variant]))
    }

    async fn edit_caption(
        &self,
        message: MessageRef,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        self.record(
            "edit_caption",
            Call::EditCaption {
                message,
                caption: caption.to_string(),
                keyboard: keyboard.cloned(),
            },
        )
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        self.record("delete_message", Call::DeleteMessage(message))
    }

    async fn send_chat_action(
        &self,
        chat: &ChatId,
        action: ChatAction,
    ) -> Result<(), TransportError> {
        self.record(
            "send_chat_action",
            Call::ChatAction {
                chat: chat.clone(),
                action,
            },
        )
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        self.record(
            "answer_callback",
            Call::AnswerCallback {
                callback_id: callback_id.to_string(),
                text: text.map(str::to_string),
            },
        )
    }
}
