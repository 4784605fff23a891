//! Publication of approved submissions.
//!
//! An approved submission becomes a low-fidelity broadcast post in the shared
//! channel plus a registry entry pointing at the full-quality original. The
//! entry is only written once the post exists, so a failed fetch, encode or
//! send leaves the registry untouched.

use std::sync::Arc;

use crate::access::AccessGate;
use crate::callback::CallbackAction;
use crate::config::Messages;
use crate::error::BotError;
use crate::fetch::PhotoFetcher;
use crate::identity::Identity;
use crate::imaging::{downsample_for_broadcast, DecodeLimits};
use crate::registry::{PhotoRegistry, PostLocation, PublicId, RegistryEntry};
use crate::transport::{
    ChatAction, ChatId, ChatTransport, ControlMessage, InlineButton, InlineKeyboard, PhotoSource,
};

/// Image parameters of a broadcast copy.
#[derive(Debug, Clone, Copy)]
pub struct PublishSettings {
    /// Pixel block is `width / block_divisor`
    pub block_divisor: u32,
    pub limits: DecodeLimits,
    pub jpeg_quality: u8,
}

/// Result of a publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The approver is not on the allow-list; nothing was posted.
    NotAuthorized,
    Published {
        public_id: PublicId,
        post: PostLocation,
        /// Pixel block size used for the broadcast copy
        block_size: u32,
        /// Whether the approval UI caption had to be rewritten
        confirmation_edited: bool,
    },
}

/// Publish / delete buttons shown under a pending submission.
pub fn control_keyboard(messages: &Messages) -> InlineKeyboard {
    InlineKeyboard::row(vec![
        InlineButton::callback(&messages.publish_button, CallbackAction::Publish.to_data()),
        InlineButton::callback(&messages.delete_button, CallbackAction::Delete.to_data()),
    ])
}

/// Single "get it" button under a broadcast post.
pub fn delivery_keyboard(public_id: &PublicId, messages: &Messages) -> InlineKeyboard {
    InlineKeyboard::row(vec![InlineButton::callback(
        &messages.get_photo_button,
        CallbackAction::GetPhoto(public_id.clone()).to_data(),
    )])
}

/// `caption`, a blank line, then `marker`; just `marker` without a caption.
pub fn with_marker(caption: Option<&str>, marker: &str) -> String {
    match caption.map(str::trim).filter(|c| !c.is_empty()) {
        Some(caption) => format!("{}\n\n{}", caption, marker),
        None => marker.to_string(),
    }
}

/// Recover the submitter's caption from an approval UI caption.
///
/// Only a trailing status marker is removed; the same words elsewhere in the
/// caption are kept.
pub fn submission_caption(ui_caption: Option<&str>, messages: &Messages) -> Option<String> {
    let caption = ui_caption?.trim();
    let caption = [&messages.ready_to_publish, &messages.publish_confirmation]
        .iter()
        .find_map(|marker| caption.strip_suffix(marker.trim()))
        .unwrap_or(caption)
        .trim();

    (!caption.is_empty()).then(|| caption.to_string())
}

pub struct PublishPipeline {
    gate: AccessGate,
    registry: Arc<dyn PhotoRegistry>,
    fetcher: Arc<PhotoFetcher>,
    transport: Arc<dyn ChatTransport>,
    channel: ChatId,
    settings: PublishSettings,
    messages: Arc<Messages>,
}

impl PublishPipeline {
    pub fn new(
        gate: AccessGate,
        registry: Arc<dyn PhotoRegistry>,
        fetcher: Arc<PhotoFetcher>,
        transport: Arc<dyn ChatTransport>,
        channel: ChatId,
        settings: PublishSettings,
        messages: Arc<Messages>,
    ) -> Self {
        Self {
            gate,
            registry,
            fetcher,
            transport,
            channel,
            settings,
            messages,
        }
    }

    /// Publish the submission shown in `ui` on behalf of `approver`.
    pub async fn publish(
        &self,
        approver: &Identity,
        ui: &ControlMessage,
    ) -> Result<PublishOutcome, BotError> {
        if !self.gate.is_authorized(approver) {
            tracing::warn!(approver = approver.handle, "Publish rejected: not an admin");
            self.transport
                .send_message(&ui.chat(), &self.messages.not_admin)
                .await?;
            return Ok(PublishOutcome::NotAuthorized);
        }

        let variant = ui
            .largest_photo()
            .ok_or_else(|| BotError::MalformedEvent("approval message has no photo".to_string()))?
            .clone();
        let public_id = PublicId::from(variant.unique_id.as_str());

        if let Err(e) = self
            .transport
            .send_chat_action(&self.channel, ChatAction::UploadPhoto)
            .await
        {
            tracing::debug!(error = %e, "Chat action failed");
        }

        let original = self.fetcher.fetch(&variant.file_id).await?;

        let settings = self.settings;
        let (encoded, block_size) = tokio::task::spawn_blocking(move || {
            downsample_for_broadcast(
                &original,
                settings.block_divisor,
                &settings.limits,
                settings.jpeg_quality,
            )
        })
        .await??;

        let caption = submission_caption(ui.caption.as_deref(), &self.messages);
        let post_caption = caption
            .as_deref()
            .unwrap_or(self.messages.published_caption.as_str());
        let keyboard = delivery_keyboard(&public_id, &self.messages);

        let photo = PhotoSource::Upload {
            data: encoded.data.into(),
            file_name: encoded.format.file_name(),
            content_type: encoded.format.content_type(),
        };
        let sent = self
            .transport
            .send_photo(&self.channel, photo, post_caption, Some(&keyboard))
            .await?;

        let post = PostLocation {
            chat_id: sent.location.chat_id,
            message_id: sent.location.message_id,
        };
        let earlier_posts = self
            .registry
            .resolve(&public_id)
            .map(|entry| entry.posts)
            .unwrap_or_default();
        self.registry.register(
            RegistryEntry::new(public_id.clone(), variant.file_id.clone())
                .with_caption(caption.clone())
                .with_posts(earlier_posts)
                .with_post(post),
        );

        tracing::info!(
            public_id = %public_id,
            approver = approver.handle,
            block_size,
            width = variant.width,
            "Published photo"
        );

        let confirmation = with_marker(caption.as_deref(), &self.messages.publish_confirmation);
        let confirmation_edited = if ui.caption.as_deref() == Some(confirmation.as_str()) {
            false
        } else {
            match self
                .transport
                .edit_caption(
                    ui.location,
                    &confirmation,
                    Some(&control_keyboard(&self.messages)),
                )
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    // The post and entry already exist; only the UI is stale
                    tracing::warn!(public_id = %public_id, error = %e, "Failed to confirm publication");
                    false
                }
            }
        };

        Ok(PublishOutcome::Published {
            public_id,
            post,
            block_size,
            confirmation_edited,
        })
    }
}
