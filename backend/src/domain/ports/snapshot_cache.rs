//! Driven port for the shared read-through cache.
//!
//! Values are serialised JSON snapshots. The cache is derived state: callers
//! treat every failure as a miss and never let it fail a request.
use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors raised by snapshot cache adapters.
    pub enum SnapshotCacheError {
        /// Cache backend is unavailable or returned an error.
        Backend { message: String } => "cache backend error: {message}",
        /// Snapshot could not be serialised or deserialised.
        Serialization { message: String } => "cache serialization failed: {message}",
    }
}

/// Key/value cache with per-entry expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Fetch a snapshot; `None` on miss or expiry.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SnapshotCacheError>;

    /// Store a snapshot that expires after `ttl`.
    async fn put(&self, key: &CacheKey, value: String, ttl: Duration)
    -> Result<(), SnapshotCacheError>;

    /// Delete the given keys. Missing keys are not an error.
    async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), SnapshotCacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn error_messages_include_context() {
        let err = SnapshotCacheError::backend("connection refused");
        assert_eq!(err.to_string(), "cache backend error: connection refused");
    }
}
