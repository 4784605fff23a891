//! Personalized delivery.
//!
//! Turns a registry entry plus a requester identity into a stamped,
//! full-quality copy sent privately to that requester.

use std::sync::Arc;

use super::stamp::{stamp, StampStyle};
use super::text::WatermarkText;
use crate::config::Messages;
use crate::error::BotError;
use crate::fetch::PhotoFetcher;
use crate::identity::Identity;
use crate::imaging::{decode, encode, DecodeLimits, EncodedImage};
use crate::registry::{PhotoRegistry, PublicId};
use crate::transport::{ChatAction, ChatId, ChatTransport, PhotoSource, SentMessage};

/// Image parameters of a delivery.
#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub style: StampStyle,
    pub limits: DecodeLimits,
    pub jpeg_quality: u8,
}

/// Result of a delivery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The public id is not (or no longer) registered; the requester was told.
    Unavailable,
    /// A stamped copy was sent.
    Delivered {
        watermark: WatermarkText,
        message: SentMessage,
    },
}

/// Decode, stamp and re-encode a photo in its source format.
pub fn personalize(
    data: &[u8],
    text: &WatermarkText,
    settings: &DeliverySettings,
) -> Result<EncodedImage, BotError> {
    let decoded = decode(data, &settings.limits)?;
    let stamped = stamp(decoded.pixels, text, &settings.style)?;
    Ok(encode(&stamped, decoded.format, settings.jpeg_quality)?)
}

/// Caption of the delivered copy.
///
/// The submission caption recorded at publish time wins. Otherwise the
/// broadcast post caption is reused unless it is exactly the generic one.
pub fn delivery_caption<'a>(
    stored: Option<&'a str>,
    post_caption: Option<&'a str>,
    messages: &'a Messages,
) -> &'a str {
    stored
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| {
            post_caption
                .map(str::trim)
                .filter(|c| !c.is_empty() && *c != messages.published_caption.trim())
        })
        .unwrap_or(messages.delivery_caption.as_str())
}

pub struct WatermarkEngine {
    registry: Arc<dyn PhotoRegistry>,
    fetcher: Arc<PhotoFetcher>,
    transport: Arc<dyn ChatTransport>,
    settings: Arc<DeliverySettings>,
    messages: Arc<Messages>,
}

impl WatermarkEngine {
    pub fn new(
        registry: Arc<dyn PhotoRegistry>,
        fetcher: Arc<PhotoFetcher>,
        transport: Arc<dyn ChatTransport>,
        settings: DeliverySettings,
        messages: Arc<Messages>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            transport,
            settings: Arc::new(settings),
            messages,
        }
    }

    /// Deliver a stamped copy of `public_id` to `requester`.
    ///
    /// Once the lookup succeeds the delivery runs to completion, even if the
    /// entry is revoked while the original is being fetched or stamped.
    pub async fn deliver(
        &self,
        requester: &Identity,
        public_id: &PublicId,
        post_caption: Option<&str>,
    ) -> Result<DeliveryOutcome, BotError> {
        let chat = ChatId::Id(requester.handle);

        let entry = match self.registry.resolve(public_id) {
            Some(entry) => entry,
            None => {
                tracing::info!(
                    public_id = %public_id,
                    requester = requester.handle,
                    "Requested photo is unavailable"
                );
                self.transport
                    .send_message(&chat, &self.messages.unavailable)
                    .await?;
                return Ok(DeliveryOutcome::Unavailable);
            }
        };

        if let Err(e) = self
            .transport
            .send_chat_action(&chat, ChatAction::UploadPhoto)
            .await
        {
            tracing::debug!(error = %e, "Chat action failed");
        }

        let original = self.fetcher.fetch(&entry.original_ref).await?;
        let watermark = WatermarkText::for_identity(requester);

        let settings = Arc::clone(&self.settings);
        let text = watermark.clone();
        let encoded =
            tokio::task::spawn_blocking(move || personalize(&original, &text, &settings)).await??;

        let caption = delivery_caption(entry.caption.as_deref(), post_caption, &self.messages);
        let photo = PhotoSource::Upload {
            data: encoded.data.into(),
            file_name: encoded.format.file_name(),
            content_type: encoded.format.content_type(),
        };
        let message = self.transport.send_photo(&chat, photo, caption, None).await?;

        tracing::info!(
            public_id = %public_id,
            requester = requester.handle,
            named = watermark.secondary.is_some(),
            "Delivered watermarked photo"
        );

        Ok(DeliveryOutcome::Delivered { watermark, message })
    }
}
