//! Revocation of published photos.
//!
//! Deleting a submission removes its registry entry, so the "get it" button
//! on an already-broadcast post starts answering "unavailable". The approval
//! message itself is removed. When retraction is configured, every broadcast
//! post of the photo is deleted, including those left by earlier publishes.

use std::sync::Arc;

use crate::error::BotError;
use crate::fetch::PhotoFetcher;
use crate::identity::Identity;
use crate::registry::{PhotoRegistry, PublicId};
use crate::transport::{ChatTransport, ControlMessage, MessageRef};

/// What a delete action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revocation {
    /// Id derived from the approval message, if it carried a photo
    pub public_id: Option<PublicId>,
    /// Whether a live registry entry was removed
    pub entry_removed: bool,
    /// Number of broadcast posts deleted
    pub posts_retracted: usize,
}

pub struct RevocationHandler {
    registry: Arc<dyn PhotoRegistry>,
    fetcher: Arc<PhotoFetcher>,
    transport: Arc<dyn ChatTransport>,
    retract_post: bool,
}

impl RevocationHandler {
    pub fn new(
        registry: Arc<dyn PhotoRegistry>,
        fetcher: Arc<PhotoFetcher>,
        transport: Arc<dyn ChatTransport>,
        retract_post: bool,
    ) -> Self {
        Self {
            registry,
            fetcher,
            transport,
            retract_post,
        }
    }

    /// Revoke the photo shown in `ui` and remove `ui`.
    ///
    /// Whoever can see the control may use it; `actor` is only logged.
    pub async fn revoke(
        &self,
        actor: &Identity,
        ui: &ControlMessage,
    ) -> Result<Revocation, BotError> {
        let public_id = ui
            .largest_photo()
            .map(|variant| PublicId::from(variant.unique_id.as_str()));

        let removed = public_id.as_ref().and_then(|id| self.registry.revoke(id));
        let mut posts_retracted = 0;

        if let Some(entry) = &removed {
            self.fetcher.invalidate(&entry.original_ref).await;

            for post in entry.posts.iter().filter(|_| self.retract_post) {
                let post = MessageRef {
                    chat_id: post.chat_id,
                    message_id: post.message_id,
                };
                match self.transport.delete_message(post).await {
                    Ok(()) => posts_retracted += 1,
                    Err(e) => tracing::warn!(
                        public_id = %entry.public_id,
                        message_id = post.message_id,
                        error = %e,
                        "Failed to retract broadcast post"
                    ),
                }
            }
        }

        self.transport.delete_message(ui.location).await?;

        tracing::info!(
            public_id = public_id.as_ref().map(PublicId::as_str).unwrap_or("-"),
            actor = actor.handle,
            entry_removed = removed.is_some(),
            posts_retracted,
            "Submission deleted"
        );

        Ok(Revocation {
            public_id,
            entry_removed: removed.is_some(),
            posts_retracted,
        })
    }
}
