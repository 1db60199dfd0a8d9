use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// In-memory map of `key -> (value, expiry)`.
///
/// Values are handed out as `Arc`s, so a hit returns the very instance that
/// was stored. The lock is never held across an await: concurrent misses
/// each rebuild and the last insert wins.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the live value for `key`, dropping it if it has expired.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(Arc::clone(&entry.value)),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.lock().insert(
            key,
            Entry {
                value: Arc::clone(&value),
                expires_at: Instant::now() + self.ttl,
            },
        );
        value
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.lock().remove(key);
    }

    /// Returns the cached value, or builds, stores and returns a fresh one.
    /// A failed build leaves the cache untouched.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, build: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let value = build().await?;
        Ok(self.insert(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<&'static str, Vec<u32>> {
        TtlCache::new(Duration::from_secs(120))
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_returns_same_instance_within_ttl() {
        let cache = cache();
        let first = cache.insert("public", vec![1, 2, 3]);

        tokio::time::advance(Duration::from_secs(119)).await;

        let second = cache.get(&"public").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache();
        cache.insert("public", vec![1]);

        tokio::time::advance(Duration::from_secs(120)).await;

        assert!(cache.get(&"public").is_none());
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let cache = cache();
        let first = cache
            .get_or_try_insert_with("admin", || async { Ok::<_, ()>(vec![1]) })
            .await
            .unwrap();
        let cached = cache
            .get_or_try_insert_with("admin", || async { Ok::<_, ()>(vec![99]) })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        cache.invalidate(&"admin");

        let rebuilt = cache
            .get_or_try_insert_with("admin", || async { Ok::<_, ()>(vec![42]) })
            .await
            .unwrap();
        assert_eq!(*rebuilt, vec![42]);
    }

    #[tokio::test]
    async fn test_failed_build_is_not_cached() {
        let cache = cache();

        let err = cache
            .get_or_try_insert_with("admin", || async { Err::<Vec<u32>, _>("db down") })
            .await
            .unwrap_err();
        assert_eq!(err, "db down");
        assert!(cache.get(&"admin").is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = cache();
        cache.insert("admin", vec![1]);
        cache.insert("public", vec![2]);

        cache.invalidate(&"admin");

        assert!(cache.get(&"admin").is_none());
        assert_eq!(*cache.get(&"public").unwrap(), vec![2]);
    }
}
