//! Event dispatch.
//!
//! Every inbound update is classified into an [`Event`] and handled on its
//! own task. Handlers share the registry and fetch cache but nothing else, so
//! a slow or failing handler never holds up unrelated events.

pub mod event;
pub mod poller;

use std::sync::Arc;

pub use event::Event;
pub use poller::{run, shutdown_signal, LongPoll, UpdateSource};

use crate::access::AccessGate;
use crate::callback::CallbackAction;
use crate::config::{Config, Messages};
use crate::error::BotError;
use crate::fetch::PhotoFetcher;
use crate::identity::Identity;
use crate::publish::{control_keyboard, with_marker, PublishPipeline, PublishSettings};
use crate::registry::PhotoRegistry;
use crate::revoke::RevocationHandler;
use crate::transport::wire::Update;
use crate::transport::{
    largest_variant, ChatId, ChatTransport, ControlMessage, MessageRef, PhotoSource, PhotoVariant,
};
use crate::watermark::{DeliverySettings, WatermarkEngine};

pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    publisher: PublishPipeline,
    engine: WatermarkEngine,
    revoker: RevocationHandler,
    messages: Arc<Messages>,
}

impl Dispatcher {
    /// Wire every component from configuration.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn ChatTransport>,
        registry: Arc<dyn PhotoRegistry>,
    ) -> Result<Self, BotError> {
        let style = config
            .watermark
            .to_stamp_style()
            .map_err(BotError::Config)?;
        let limits = config.fetch.decode_limits();
        let messages = Arc::new(config.messages.clone());
        let fetcher = Arc::new(PhotoFetcher::new(Arc::clone(&transport), &config.fetch));

        let publisher = PublishPipeline::new(
            AccessGate::new(config.admins.clone()),
            Arc::clone(&registry),
            Arc::clone(&fetcher),
            Arc::clone(&transport),
            config.channel.clone(),
            PublishSettings {
                block_divisor: config.publish.block_divisor,
                limits,
                jpeg_quality: config.watermark.jpeg_quality,
            },
            Arc::clone(&messages),
        );

        let engine = WatermarkEngine::new(
            Arc::clone(&registry),
            Arc::clone(&fetcher),
            Arc::clone(&transport),
            DeliverySettings {
                style,
                limits,
                jpeg_quality: config.watermark.jpeg_quality,
            },
            Arc::clone(&messages),
        );

        let revoker = RevocationHandler::new(
            registry,
            fetcher,
            Arc::clone(&transport),
            config.publish.retract_post_on_delete,
        );

        Ok(Self {
            transport,
            publisher,
            engine,
            revoker,
            messages,
        })
    }

    /// Classify and handle one update. Never fails: errors are logged and
    /// the actor gets a generic failure notice.
    pub async fn dispatch(&self, update: Update) {
        let update_id = update.update_id;
        let event = Event::classify(update, &self.messages);
        let kind = event.kind();

        if let Err(e) = self.handle(&event).await {
            tracing::error!(update_id, event = kind, error = %e, "Failed to handle event");

            if let Some(chat) = event.reply_chat() {
                if let Err(e) = self
                    .transport
                    .send_message(&chat, &self.messages.operation_failed)
                    .await
                {
                    tracing::warn!(update_id, error = %e, "Failed to report failure");
                }
            }
        }

        // Button presses are always acknowledged so the client stops spinning
        if let Event::Action { callback_id, .. } = &event {
            if let Err(e) = self.transport.answer_callback(callback_id, None).await {
                tracing::debug!(update_id, error = %e, "Failed to answer callback");
            }
        }
    }

    pub async fn handle(&self, event: &Event) -> Result<(), BotError> {
        match event {
            Event::Submission {
                message,
                caption,
                photo,
            } => self.offer(*message, caption.as_deref(), photo).await,
            Event::Help { chat } => self.reply(chat, &self.messages.help).await,
            Event::UnsupportedMedia { chat } => self.reply(chat, &self.messages.video_only).await,
            Event::TextWithoutPhoto { chat } => self.reply(chat, &self.messages.no_photo).await,
            Event::Action {
                actor,
                action,
                control,
                ..
            } => match action {
                Some(action) => self.act(actor, action, control.as_ref()).await,
                None => {
                    tracing::debug!(actor = actor.handle, "Ignoring unknown button payload");
                    Ok(())
                }
            },
            Event::Ignored => Ok(()),
        }
    }

    async fn reply(&self, chat: &ChatId, text: &str) -> Result<(), BotError> {
        self.transport.send_message(chat, text).await?;
        Ok(())
    }

    /// Replace a submitted photo with an approval message carrying
    /// publish/delete controls.
    async fn offer(
        &self,
        message: MessageRef,
        caption: Option<&str>,
        photo: &[PhotoVariant],
    ) -> Result<(), BotError> {
        let variant = largest_variant(photo)
            .ok_or_else(|| BotError::MalformedEvent("submission has no photo".to_string()))?;

        if let Err(e) = self.transport.delete_message(message).await {
            tracing::debug!(error = %e, "Could not delete submitted message");
        }

        let ui_caption = with_marker(caption, &self.messages.ready_to_publish);
        self.transport
            .send_photo(
                &ChatId::Id(message.chat_id),
                PhotoSource::Existing(variant.file_id.clone()),
                &ui_caption,
                Some(&control_keyboard(&self.messages)),
            )
            .await?;

        tracing::info!(
            chat_id = message.chat_id,
            unique_id = %variant.unique_id,
            "Submission awaiting approval"
        );
        Ok(())
    }

    async fn act(
        &self,
        actor: &Identity,
        action: &CallbackAction,
        control: Option<&ControlMessage>,
    ) -> Result<(), BotError> {
        match action {
            CallbackAction::Publish => {
                let ui = require_control(control)?;
                self.publisher.publish(actor, ui).await?;
                Ok(())
            }
            CallbackAction::Delete => {
                let ui = require_control(control)?;
                self.revoker.revoke(actor, ui).await?;
                Ok(())
            }
            CallbackAction::GetPhoto(public_id) => {
                let post_caption = control.and_then(|c| c.caption.as_deref());
                self.engine.deliver(actor, public_id, post_caption).await?;
                Ok(())
            }
        }
    }
}

fn require_control(control: Option<&ControlMessage>) -> Result<&ControlMessage, BotError> {
    control.ok_or_else(|| {
        BotError::MalformedEvent("button press without its message".to_string())
    })
}
