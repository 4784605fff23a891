//! Photo registry.
//!
//! Process-lifetime mapping from a photo's public identifier to the reference
//! of its original, full-quality bytes. Entries are created on publish,
//! removed on revoke, and never expire on their own.
//!
//! Every mutation is a single lock-scoped step; callers that suspend between
//! `resolve` and their follow-up I/O may observe an entry that has since been
//! revoked. That window is accepted: an in-flight delivery always completes.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Stable, content-derived public identifier of a published photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicId(String);

impl PublicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PublicId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Location of the broadcast post in the shared channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostLocation {
    pub chat_id: i64,
    pub message_id: i64,
}

/// A live registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub public_id: PublicId,
    /// Opaque transport reference resolving to the original bytes.
    pub original_ref: String,
    /// Caption supplied with the submission, kept so delivery never has to
    /// reverse-engineer it from the broadcast text.
    pub caption: Option<String>,
    /// Every broadcast post of this photo, oldest first. Republishing
    /// appends, so revocation can retract them all.
    pub posts: Vec<PostLocation>,
}

impl RegistryEntry {
    pub fn new(public_id: PublicId, original_ref: impl Into<String>) -> Self {
        Self {
            public_id,
            original_ref: original_ref.into(),
            caption: None,
            posts: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_post(mut self, post: PostLocation) -> Self {
        self.posts.push(post);
        self
    }

    pub fn with_posts(mut self, posts: impl IntoIterator<Item = PostLocation>) -> Self {
        self.posts.extend(posts);
        self
    }
}

/// Key-value store behind publish, delivery and revocation.
#[cfg_attr(test, mockall::automock)]
pub trait PhotoRegistry: Send + Sync {
    /// Insert or overwrite the entry for `entry.public_id`.
    fn register(&self, entry: RegistryEntry);

    /// Look up a live entry. Absence is not an error.
    fn resolve(&self, public_id: &PublicId) -> Option<RegistryEntry>;

    /// Remove the entry if present, returning it. Absent ids are a no-op.
    fn revoke(&self, public_id: &PublicId) -> Option<RegistryEntry>;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: RwLock<HashMap<PublicId, RegistryEntry>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the live public ids, sorted.
    pub fn public_ids(&self) -> Vec<PublicId> {
        let mut ids: Vec<PublicId> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl PhotoRegistry for MemoryRegistry {
    fn register(&self, entry: RegistryEntry) {
        let replaced = self
            .entries
            .write()
            .insert(entry.public_id.clone(), entry.clone());

        tracing::debug!(
            public_id = %entry.public_id,
            replaced = replaced.is_some(),
            "Registered photo"
        );
    }

    fn resolve(&self, public_id: &PublicId) -> Option<RegistryEntry> {
        self.entries.read().get(public_id).cloned()
    }

    fn revoke(&self, public_id: &PublicId) -> Option<RegistryEntry> {
        let removed = self.entries.write().remove(public_id);

        tracing::debug!(
            public_id = %public_id,
            removed = removed.is_some(),
            "Revoked photo"
        );

        removed
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
