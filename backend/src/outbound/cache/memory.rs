//! Process-local snapshot cache with clock-driven expiry.
//!
//! Used when no Redis URL is configured and by integration tests. Entries
//! live in a mutex-guarded map; expired entries are dropped lazily on read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CacheKey, SnapshotCache, SnapshotCacheError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory [`SnapshotCache`].
#[derive(Clone)]
pub struct InMemorySnapshotCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySnapshotCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = self.clock.utc();
        self.lock()
            .map(|entries| entries.values().filter(|entry| entry.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, SnapshotCacheError> {
        self.entries
            .lock()
            .map_err(|_| SnapshotCacheError::backend("cache mutex poisoned"))
    }
}

#[async_trait]
impl SnapshotCache for InMemorySnapshotCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SnapshotCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), SnapshotCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| SnapshotCacheError::backend(format!("invalid ttl: {err}")))?;
        let expires_at = self.clock.utc() + ttl;
        self.lock()?
            .insert(key.as_str().to_owned(), Entry { value, expires_at });
        Ok(())
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> Result<(), SnapshotCacheError> {
        let mut entries = self.lock()?;
        for key in keys {
            entries.remove(key.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingId;
    use crate::test_support::{MutableClock, epoch};
    use rstest::{fixture, rstest};

    struct Fixture {
        clock: Arc<MutableClock>,
        cache: InMemorySnapshotCache,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let clock = Arc::new(MutableClock::new(epoch()));
        let cache = InMemorySnapshotCache::new(clock.clone());
        Fixture { clock, cache }
    }

    #[rstest]
    #[tokio::test]
    async fn entry_is_served_until_ttl_elapses(fixture: Fixture) {
        let key = CacheKey::all_listings();
        fixture
            .cache
            .put(&key, "[]".to_owned(), Duration::from_secs(300))
            .await
            .expect("put");

        fixture.clock.advance_seconds(299);
        assert_eq!(
            fixture.cache.get(&key).await.expect("get"),
            Some("[]".to_owned())
        );

        fixture.clock.advance_seconds(1);
        assert_eq!(fixture.cache.get(&key).await.expect("get"), None);
        assert!(fixture.cache.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn invalidate_removes_only_named_keys(fixture: Fixture) {
        let listing = CacheKey::listing(ListingId::random());
        let all = CacheKey::all_listings();
        for key in [&listing, &all] {
            fixture
                .cache
                .put(key, "{}".to_owned(), Duration::from_secs(60))
                .await
                .expect("put");
        }

        fixture
            .cache
            .invalidate(std::slice::from_ref(&listing))
            .await
            .expect("invalidate");

        assert_eq!(fixture.cache.get(&listing).await.expect("get"), None);
        assert!(fixture.cache.get(&all).await.expect("get").is_some());
        assert_eq!(fixture.cache.len(), 1);
    }
}
