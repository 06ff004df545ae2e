//! Expiring key-value cache with an injectable clock.
//!
//! Entries carry their insertion time; a lookup older than the TTL is a miss and the
//! entry is dropped. When the entry count passes the size bound, every stale entry is
//! swept. Storage is a moka cache, which also enforces a hard capacity.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;

use super::Clock;

/// TTL cache keyed by `K`.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, (V, DateTime<Utc>)>,
    ttl: Duration,
    size_bound: u64,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache. Stale entries are swept once more than `size_bound` are held.
    #[must_use]
    pub fn new(ttl: Duration, size_bound: u64, clock: Arc<dyn Clock>) -> Self {
        let inner = Cache::builder().max_capacity(size_bound.saturating_mul(2).max(1)).build();
        Self { inner, ttl, size_bound, clock }
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<V> {
        let (value, inserted_at) = self.inner.get(key).await?;
        if self.is_stale(inserted_at) {
            self.inner.invalidate(key).await;
            return None;
        }
        Some(value)
    }

    /// Store a value stamped with the current time.
    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, (value, self.clock.now())).await;

        self.inner.run_pending_tasks().await;
        if self.inner.entry_count() > self.size_bound {
            self.evict_expired().await;
        }
    }

    /// Drop every stale entry.
    pub async fn evict_expired(&self) {
        let stale: Vec<Arc<K>> = self
            .inner
            .iter()
            .filter(|(_, (_, inserted_at))| self.is_stale(*inserted_at))
            .map(|(key, _)| key)
            .collect();

        if !stale.is_empty() {
            tracing::debug!(evicted = stale.len(), "Sweeping stale cache entries");
        }
        for key in stale {
            self.inner.invalidate(key.as_ref()).await;
        }
        self.inner.run_pending_tasks().await;
    }

    /// Entries currently held, stale ones included.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    /// Whether the cache holds nothing.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_stale(&self, inserted_at: DateTime<Utc>) -> bool {
        let age = self.clock.now() - inserted_at;
        age.to_std().is_ok_and(|age| age >= self.ttl)
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("size_bound", &self.size_bound)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ManualClock;

    fn cache(bound: u64) -> (Arc<ManualClock>, TtlCache<String, u32>) {
        let clock = Arc::new(ManualClock::at_year(2026));
        let cache = TtlCache::new(Duration::from_secs(60), bound, clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn test_fresh_entry_hits() {
        let (clock, cache) = cache(10);
        cache.insert("a".to_string(), 1).await;
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));
    }

    #[tokio::test]
    async fn test_entry_expires_at_ttl() {
        let (clock, cache) = cache(10);
        cache.insert("a".to_string(), 1).await;
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get(&"a".to_string()).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entries_expire_independently() {
        let (clock, cache) = cache(10);
        cache.insert("old".to_string(), 1).await;
        clock.advance(Duration::from_secs(40));
        cache.insert("new".to_string(), 2).await;
        clock.advance(Duration::from_secs(30));

        assert_eq!(cache.get(&"old".to_string()).await, None);
        assert_eq!(cache.get(&"new".to_string()).await, Some(2));
    }

    #[tokio::test]
    async fn test_sweep_when_over_bound() {
        let (clock, cache) = cache(2);
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;
        clock.advance(Duration::from_secs(120));
        cache.insert("c".to_string(), 3).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&"c".to_string()).await, Some(3));
    }

    #[test]
    fn test_usable_from_blocking_context() {
        let (_, cache) = cache(4);
        tokio_test::block_on(async {
            cache.insert("k".to_string(), 7).await;
            assert_eq!(cache.get(&"k".to_string()).await, Some(7));
        });
    }
}
