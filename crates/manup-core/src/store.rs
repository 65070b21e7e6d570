use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use manup_host::{CacheError, CacheStore, MetadataSource, PolicyMetadata, SourceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEY_SUFFIX: &str = "manup";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no cache store configured")]
    CacheUnavailable,
    #[error("no cached metadata")]
    NoCachedData,
    #[error("cached metadata is corrupt: {details}")]
    CorruptCache { details: String },
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("metadata unavailable (remote: {remote}; cache: {cache})")]
    Unavailable {
        remote: SourceError,
        cache: Box<StoreError>,
    },
}

/// What gets written under the cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedMetadata {
    metadata: PolicyMetadata,
    cached_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBlob {
    Envelope(CachedMetadata),
    Bare(PolicyMetadata),
}

/// Remote fetch with fallback to the last persisted document.
pub struct MetadataStore {
    source: Arc<dyn MetadataSource>,
    cache: Option<Arc<dyn CacheStore>>,
    key: String,
}

impl MetadataStore {
    pub fn new(
        source: Arc<dyn MetadataSource>,
        cache: Option<Arc<dyn CacheStore>>,
        namespace: &str,
    ) -> Self {
        Self {
            source,
            cache,
            key: format!("{namespace}.{KEY_SUFFIX}"),
        }
    }

    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.key
    }

    /// Fetch the remote document, persisting it on success and falling back
    /// to the cached copy on any retrieval failure.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] only when both the remote source
    /// and the cache fail.
    pub async fn fetch(&self) -> Result<PolicyMetadata, StoreError> {
        match self.source.fetch().await {
            Ok(metadata) => {
                match self.save(&metadata).await {
                    Ok(()) => debug!("Cached update policy under {}", self.key),
                    Err(StoreError::CacheUnavailable) => {}
                    Err(error) => warn!("Failed to cache update policy: {error}"),
                }
                Ok(metadata)
            }
            Err(remote) => {
                warn!("Update policy fetch failed, trying cache: {remote}");
                self.load_cached()
                    .await
                    .map_err(|cache| StoreError::Unavailable {
                        remote,
                        cache: Box::new(cache),
                    })
            }
        }
    }

    /// Load the last persisted document.
    ///
    /// # Errors
    /// Returns [`StoreError::CacheUnavailable`] without a cache,
    /// [`StoreError::NoCachedData`] when nothing was saved yet, and
    /// [`StoreError::CorruptCache`] when the stored blob cannot be read.
    pub async fn load_cached(&self) -> Result<PolicyMetadata, StoreError> {
        let cache = self.cache.as_ref().ok_or(StoreError::CacheUnavailable)?;
        let raw = cache.get(&self.key).await?.ok_or(StoreError::NoCachedData)?;

        match serde_json::from_str(&raw) {
            Ok(StoredBlob::Envelope(cached)) => {
                debug!("Using update policy cached at {}", cached.cached_at);
                Ok(cached.metadata)
            }
            Ok(StoredBlob::Bare(metadata)) => {
                debug!("Using cached update policy");
                Ok(metadata)
            }
            Err(error) => Err(StoreError::CorruptCache {
                details: error.to_string(),
            }),
        }
    }

    /// Persist `metadata` under the namespaced key.
    ///
    /// # Errors
    /// Returns [`StoreError::CacheUnavailable`] without a cache, or the
    /// cache's own error when the write fails.
    pub async fn save(&self, metadata: &PolicyMetadata) -> Result<(), StoreError> {
        let cache = self.cache.as_ref().ok_or(StoreError::CacheUnavailable)?;
        let blob = CachedMetadata {
            metadata: metadata.clone(),
            cached_at: Utc::now(),
        };
        let serialized = serde_json::to_string(&blob).map_err(CacheError::from)?;
        cache.set(&self.key, serialized).await?;
        Ok(())
    }
}

/// Process-local cache, mostly useful for tests and hosts without storage.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}
