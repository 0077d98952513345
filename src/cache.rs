//! SharedCache - process-wide TTL cache of fetched collections.
//!
//! Pages that show the same collection (the full product list feeds the home
//! page, the category overview and search) read through one cache instead of
//! refetching. Entries are stored as serde_json bytes keyed by `CollectionKey`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::collection::CollectionKey;
use crate::config::DEFAULT_CACHE_TTL;
use crate::error::ClientError;

struct CachedEntry {
    bytes: Vec<u8>,
    stored_at: Instant,
}

/// Clone-friendly via Arc; all clones share the same entries.
#[derive(Clone)]
pub struct SharedCache {
    entries: Arc<RwLock<HashMap<CollectionKey, CachedEntry>>>,
    /// Bumped on every invalidation; a fill that started under an older
    /// generation is not stored.
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl SharedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`. Expired entries are evicted and count as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &CollectionKey) -> Result<Option<T>, ClientError> {
        {
            let entries = self
                .entries
                .read()
                .map_err(|_| ClientError::LockPoisoned("cache read"))?;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    debug!(%key, "cache hit");
                    let value = serde_json::from_slice(&entry.bytes).map_err(|e| {
                        ClientError::Malformed {
                            endpoint: key.to_string(),
                            detail: e.to_string(),
                        }
                    })?;
                    return Ok(Some(value));
                }
                Some(_) => {}
                None => {
                    debug!(%key, "cache miss");
                    return Ok(None);
                }
            }
        }

        self.entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("cache evict"))?
            .remove(key);
        debug!(%key, "cache entry expired");
        Ok(None)
    }

    pub fn put<T: Serialize>(&self, key: CollectionKey, value: &T) -> Result<(), ClientError> {
        self.store(key, value, None).map(|_| ())
    }

    /// Insert `value`, unless `since` is given and an invalidation ran after it.
    /// Returns whether the entry was written.
    fn store<T: Serialize>(
        &self,
        key: CollectionKey,
        value: &T,
        since: Option<u64>,
    ) -> Result<bool, ClientError> {
        let bytes = serde_json::to_vec(value).map_err(|e| ClientError::Malformed {
            endpoint: key.to_string(),
            detail: e.to_string(),
        })?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("cache write"))?;
        if since.is_some_and(|generation| generation != self.generation.load(Ordering::SeqCst)) {
            debug!(%key, "cache fill outlived an invalidation, not stored");
            return Ok(false);
        }
        entries.insert(
            key,
            CachedEntry {
                bytes,
                stored_at: Instant::now(),
            },
        );
        Ok(true)
    }

    /// Serve a fresh hit, otherwise run `loader` and store its result.
    /// Failures pass through and are never cached.
    pub async fn fetch_through<T, F>(&self, key: &CollectionKey, loader: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ClientError>>,
    {
        if let Some(hit) = self.get(key)? {
            return Ok(hit);
        }
        let since = self.generation.load(Ordering::SeqCst);
        let value = loader.await?;
        self.store(key.clone(), &value, Some(since))?;
        Ok(value)
    }

    pub fn invalidate(&self, key: &CollectionKey) -> Result<(), ClientError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("cache invalidate"))?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let removed = entries.remove(key).is_some();
        if removed {
            debug!(%key, "cache invalidated");
        }
        Ok(())
    }

    /// Drop every entry whose endpoint starts with `prefix`.
    pub fn invalidate_endpoint(&self, prefix: &str) -> Result<usize, ClientError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ClientError::LockPoisoned("cache invalidate"))?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        let before = entries.len();
        entries.retain(|key, _| !key.is_under(prefix));
        let dropped = before - entries.len();
        debug!(prefix, dropped, "cache endpoint invalidated");
        Ok(dropped)
    }

    pub fn len(&self) -> Result<usize, ClientError> {
        self.entries
            .read()
            .map(|entries| entries.len())
            .map_err(|_| ClientError::LockPoisoned("cache len"))
    }

    pub fn is_empty(&self) -> Result<bool, ClientError> {
        Ok(self.len()? == 0)
    }
}
