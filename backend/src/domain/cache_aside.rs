//! Read-through caching shared by the catalog and relations services.
//!
//! Reads consult the cache first and fall back to the loader on a miss, a
//! backend fault, or an undecodable entry. Populate and invalidate faults are
//! logged and swallowed: the cache is derived state and never fails a
//! request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::Error;
use super::ports::{CacheKey, SnapshotCache};

/// Lifetime of every cached snapshot.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(300);

/// Cache-aside policy over a [`SnapshotCache`].
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn SnapshotCache>,
    ttl: Duration,
}

impl CacheAside {
    /// Wrap `cache` with the standard snapshot TTL.
    pub fn new(cache: Arc<dyn SnapshotCache>) -> Self {
        Self {
            cache,
            ttl: SNAPSHOT_TTL,
        }
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// Errors from `load` propagate and are never cached.
    pub async fn read_through<T, F, Fut>(&self, key: &CacheKey, load: F) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(hit) = self.lookup(key).await {
            return Ok(hit);
        }
        let value = load().await?;
        self.populate(key, &value).await;
        Ok(value)
    }

    /// Delete `keys`, logging rather than propagating failures.
    pub async fn invalidate(&self, keys: &[CacheKey]) {
        if let Err(error) = self.cache.invalidate(keys).await {
            let keys: Vec<&str> = keys.iter().map(CacheKey::as_str).collect();
            warn!(?keys, %error, "cache invalidation failed; entries expire by TTL");
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key = %key, "cache hit");
                    Some(value)
                }
                Err(error) => {
                    warn!(key = %key, %error, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(key = %key, "cache miss");
                None
            }
            Err(error) => {
                warn!(key = %key, %error, "cache read failed; falling back to store");
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key = %key, %error, "failed to serialise cache snapshot");
                return;
            }
        };
        if let Err(error) = self.cache.put(key, raw, self.ttl).await {
            warn!(key = %key, %error, "cache populate failed");
        }
    }
}
