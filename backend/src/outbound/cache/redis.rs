//! Redis-backed snapshot cache.
//!
//! Connections come from a `bb8-redis` pool that connects lazily, so the
//! service starts while Redis is down. Every attempt, pool checkout
//! included, is bounded by [`RedisTimeouts::command`] and retried under
//! [`RetryPolicy`]; once the retries are spent the failure is reported as
//! [`SnapshotCacheError::Backend`] and the caller falls back to the store.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::{self, AsyncCommands};
use tokio::time::timeout;

use super::RetryPolicy;
use crate::domain::ports::{CacheKey, SnapshotCache, SnapshotCacheError};

/// Default wait for a pooled connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(200);
/// Default bound on a single command attempt, checkout included.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Per-attempt time limits for Redis calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedisTimeouts {
    /// How long pool checkout waits for a connection.
    pub connect: Duration,
    /// How long one command attempt may take before it counts as failed.
    pub command: Duration,
}

impl Default for RedisTimeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            command: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Pooled Redis cache adapter.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    pool: Pool<RedisConnectionManager>,
    retry: RetryPolicy,
    command_timeout: Duration,
}

impl RedisSnapshotCache {
    /// Build a lazily connecting pool for `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotCacheError::Backend`] when the URL is malformed.
    pub fn connect(
        redis_url: &str,
        retry: RetryPolicy,
        timeouts: RedisTimeouts,
    ) -> Result<Self, SnapshotCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| SnapshotCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .connection_timeout(timeouts.connect)
            .build_unchecked(manager);
        Ok(Self {
            pool,
            retry,
            command_timeout: timeouts.command,
        })
    }

    async fn bounded<T, F>(&self, attempt: F) -> Result<T, SnapshotCacheError>
    where
        F: Future<Output = Result<T, SnapshotCacheError>>,
    {
        timeout(self.command_timeout, attempt)
            .await
            .unwrap_or_else(|_| {
                Err(SnapshotCacheError::backend(format!(
                    "timed out after {} ms",
                    self.command_timeout.as_millis()
                )))
            })
    }

    /// Seconds for `SETEX`; Redis rejects a zero expiry.
    fn expiry_seconds(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }

    async fn get_once(&self, key: &str) -> Result<Option<String>, SnapshotCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SnapshotCacheError::backend(err.to_string()))?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(map_redis_error)
    }

    async fn put_once(&self, key: &str, value: &str, seconds: u64) -> Result<(), SnapshotCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SnapshotCacheError::backend(err.to_string()))?;
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn del_once(&self, keys: &[&str]) -> Result<(), SnapshotCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SnapshotCacheError::backend(err.to_string()))?;
        conn.del::<_, ()>(keys).await.map_err(map_redis_error)
    }
}

fn map_redis_error(err: redis::RedisError) -> SnapshotCacheError {
    SnapshotCacheError::backend(err.to_string())
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SnapshotCacheError> {
        self.retry
            .run("GET", || self.bounded(self.get_once(key.as_str())))
            .await
    }

    async fn put(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), SnapshotCacheError> {
        let seconds = Self::expiry_seconds(ttl);
        self.retry
            .run("SETEX", || {
                self.bounded(self.put_once(key.as_str(), &value, seconds))
            })
            .await
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), SnapshotCacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = keys.iter().map(CacheKey::as_str).collect();
        self.retry
            .run("DEL", || self.bounded(self.del_once(&names)))
            .await
    }
}
