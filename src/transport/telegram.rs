//! Telegram Bot API client.
//!
//! Implements [`ChatTransport`] with plain HTTPS calls: JSON bodies for
//! ordinary methods, multipart for photo uploads, `getFile` plus a download
//! for fetching bytes. Long polling (`getUpdates`) is exposed separately for
//! the bot run loop.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::wire::{ApiResponse, File, Message, Update};
use super::{
    ChatAction, ChatId, ChatTransport, InlineKeyboard, MessageRef, PhotoSource, SentMessage,
    TransportError,
};

/// Client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    max_file_size: u64,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

impl TelegramClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Request` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(
        api_url: &str,
        token: &str,
        request_timeout: Duration,
        max_file_size: u64,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            max_file_size,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, TransportError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .http
            .post(self.method_url(method))
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        unwrap_response(method, response)
    }

    async fn call_multipart<T>(&self, method: &str, form: Form) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let response: ApiResponse<T> = self
            .http
            .post(self.method_url(method))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        unwrap_response(method, response)
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }
}

/// Attach `reply_markup` only when there is a keyboard; the API rejects `null`.
fn with_markup(mut body: Value, keyboard: Option<&InlineKeyboard>) -> Value {
    if let Some(keyboard) = keyboard {
        body["reply_markup"] = json!(keyboard);
    }
    body
}

fn unwrap_response<T>(method: &str, response: ApiResponse<T>) -> Result<T, TransportError> {
    if !response.ok {
        return Err(TransportError::Api {
            code: response.error_code,
            description: response
                .description
                .unwrap_or_else(|| format!("{} failed without description", method)),
        });
    }

    response
        .result
        .ok_or_else(|| TransportError::InvalidResponse(format!("{} returned no result", method)))
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn fetch_file(&self, file_id: &str) -> Result<Bytes, TransportError> {
        let file: File = self.call("getFile", &json!({ "file_id": file_id })).await?;

        if let Some(size) = file.file_size {
            if size > self.max_file_size {
                return Err(TransportError::FileTooLarge {
                    size,
                    max_size: self.max_file_size,
                });
            }
        }

        let path = file.file_path.ok_or_else(|| {
            TransportError::InvalidResponse(format!("getFile returned no path for {}", file_id))
        })?;

        let response = self
            .http
            .get(self.file_url(&path))
            .send()
            .await?
            .error_for_status()?;
        let data = response.bytes().await?;

        if data.len() as u64 > self.max_file_size {
            return Err(TransportError::FileTooLarge {
                size: data.len() as u64,
                max_size: self.max_file_size,
            });
        }

        Ok(data)
    }

    async fn send_message(&self, chat: &ChatId, text: &str) -> Result<SentMessage, TransportError> {
        let message: Message = self
            .call("sendMessage", &json!({ "chat_id": chat, "text": text }))
            .await?;
        Ok(message.into_sent())
    }

    async fn send_photo(
        &self,
        chat: &ChatId,
        photo: PhotoSource,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        let message: Message = match photo {
            PhotoSource::Existing(file_id) => {
                let body = with_markup(
                    json!({ "chat_id": chat, "photo": file_id, "caption": caption }),
                    keyboard,
                );
                self.call("sendPhoto", &body).await?
            }
            PhotoSource::Upload {
                data,
                file_name,
                content_type,
            } => {
                let part = Part::bytes(data.to_vec())
                    .file_name(file_name)
                    .mime_str(content_type)?;

                let mut form = Form::new()
                    .text("chat_id", chat.to_string())
                    .text("caption", caption.to_string())
                    .part("photo", part);

                if let Some(keyboard) = keyboard {
                    let markup = serde_json::to_string(keyboard)
                        .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
                    form = form.text("reply_markup", markup);
                }

                self.call_multipart("sendPhoto", form).await?
            }
        };

        Ok(message.into_sent())
    }

    async fn edit_caption(
        &self,
        message: MessageRef,
        caption: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        // Result is the edited Message, or `true` for inline messages
        let body = with_markup(
            json!({
                "chat_id": message.chat_id,
                "message_id": message.message_id,
                "caption": caption,
            }),
            keyboard,
        );
        let _: Value = self.call("editMessageCaption", &body).await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "deleteMessage",
                &json!({
                    "chat_id": message.chat_id,
                    "message_id": message.message_id,
                }),
            )
            .await?;
        Ok(())
    }

    async fn send_chat_action(
        &self,
        chat: &ChatId,
        action: ChatAction,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "sendChatAction",
                &json!({ "chat_id": chat, "action": action.as_str() }),
            )
            .await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_id, "text": text }),
            )
            .await?;
        Ok(())
    }
}
