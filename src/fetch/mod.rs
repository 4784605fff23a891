//! Original photo fetching.
//!
//! Publish and delivery both need the full-quality bytes behind a file
//! reference. `PhotoFetcher` goes through the transport and keeps recently
//! fetched originals in a `moka` cache bounded by total bytes, so a burst of delivery
//! requests for a freshly published photo downloads it once.

use bytes::Bytes;
use moka::future::Cache;
use std::sync::Arc;

use crate::config::FetchConfig;
use crate::transport::{ChatTransport, TransportError};

/// Fetches original bytes by opaque reference, with caching.
pub struct PhotoFetcher {
    transport: Arc<dyn ChatTransport>,
    cache: Cache<String, Bytes>,
    max_file_size: u64,
}

impl PhotoFetcher {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &FetchConfig) -> Self {
        let cache = Cache::builder()
            .weigher(|_key, data: &Bytes| u32::try_from(data.len()).unwrap_or(u32::MAX))
            .max_capacity(config.max_cache_size_bytes())
            .time_to_live(config.cache_ttl())
            .build();

        Self {
            transport,
            cache,
            max_file_size: config.max_file_size_bytes(),
        }
    }

    /// Bytes behind `file_ref`, from cache or the transport.
    pub async fn fetch(&self, file_ref: &str) -> Result<Bytes, TransportError> {
        if let Some(data) = self.cache.get(file_ref).await {
            tracing::debug!(file_ref = %file_ref, size = data.len(), "Fetch cache hit");
            return Ok(data);
        }

        let data = self.transport.fetch_file(file_ref).await?;
        if data.len() as u64 > self.max_file_size {
            return Err(TransportError::FileTooLarge {
                size: data.len() as u64,
                max_size: self.max_file_size,
            });
        }

        tracing::debug!(file_ref = %file_ref, size = data.len(), "Fetched original photo");
        self.cache.insert(file_ref.to_string(), data.clone()).await;
        Ok(data)
    }

    /// Drop cached bytes for `file_ref`.
    pub async fn invalidate(&self, file_ref: &str) {
        self.cache.invalidate(file_ref).await;
    }

    /// Number of cached originals, after pending maintenance has run.
    pub async fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Total bytes held by the cache, after pending maintenance has run.
    pub async fn cached_bytes(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.weighted_size()
    }
}
