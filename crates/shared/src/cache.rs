//! Read-through TTL cache for lookup results.
//!
//! Lookup caching is a latency optimization with bounded staleness, never a
//! source of truth: callers must tolerate entries up to one TTL old and
//! invalidate on writes they know about. Expired entries are dropped lazily
//! on access.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A single cached value with its insertion time.
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Time-bounded cache keyed by `K`.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but is expired; drop it under the write lock.
        self.entries.write().await.remove(key);
        None
    }

    /// Inserts or replaces the value for `key`, resetting its TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.entries.write().await.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Removes the entry for `key`, if any.
    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_inserted_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("reader-01".to_string(), 7i64).await;
        assert_eq!(cache.get(&"reader-01".to_string()).await, Some(7));
    }

    #[tokio::test]
    async fn test_get_misses_unknown_key() {
        let cache: TtlCache<String, i64> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"reader-01".to_string()).await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("reader-01".to_string(), 7i64).await;
        assert_eq!(cache.get(&"reader-01".to_string()).await, None);
        // Lazy eviction removed the entry entirely.
        assert!(cache.entries.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_replaces_and_refreshes() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("reader-01".to_string(), 1i64).await;
        cache.insert("reader-01".to_string(), 2i64).await;
        assert_eq!(cache.get(&"reader-01".to_string()).await, Some(2));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("reader-01".to_string(), 7i64).await;
        cache.invalidate(&"reader-01".to_string()).await;
        assert_eq!(cache.get(&"reader-01".to_string()).await, None);
    }

    #[tokio::test]
    async fn test_clear_removes_all() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1i64).await;
        cache.insert("b".to_string(), 2i64).await;
        cache.clear().await;
        assert_eq!(cache.get(&"a".to_string()).await, None);
        assert_eq!(cache.get(&"b".to_string()).await, None);
    }
}
