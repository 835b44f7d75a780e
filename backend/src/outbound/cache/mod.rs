//! Snapshot cache adapters.
//!
//! - [`RedisSnapshotCache`]: shared cache for deployed instances, using
//!   `bb8-redis` with bounded exponential backoff.
//! - [`InMemorySnapshotCache`]: process-local stand-in for development and
//!   tests.

mod memory;
mod redis;
mod retry;

pub use memory::InMemorySnapshotCache;
pub use redis::{
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, RedisSnapshotCache, RedisTimeouts,
};
pub use retry::{BACKOFF_BASE, BACKOFF_CAP, DEFAULT_MAX_RETRIES, RetryPolicy};
