//! SharedCache: lock-guarded LRU cache with statistics

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Thread-safe handle to an [`LruCache`]
///
/// Every call takes the lock for its whole duration, so callers never observe
/// a partially applied update. Cloning the handle shares the same cache and
/// statistics.
pub struct SharedCache<K, V> {
    /// LRU cache guarded by a single lock
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Create a new SharedCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_cache(LruCache::new(capacity)?))
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Get a value, marking it most recently used
    ///
    /// # Returns
    /// * `Result<V>` - A clone of the cached value, or `Error::NotFound`
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Ok(value.clone())
            }
            None => {
                self.stats.record_miss();
                Err(Error::NotFound)
            }
        }
    }

    /// Insert or overwrite a value
    ///
    /// # Returns
    /// * `Option<V>` - The evicted least recently used value, if any
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.cache.lock();
        if cache.contains(&key) {
            self.stats.record_update();
            return cache.set(key, value);
        }

        self.stats.record_insert();
        let evicted = cache.set(key, value);
        if evicted.is_some() {
            self.stats.record_eviction();
            trace!(len = cache.len(), capacity = cache.capacity(), "evicted least recently used entry");
        }
        evicted
    }

    /// Remove a value from the cache
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().remove(key)
    }

    /// Check whether a key is cached without touching recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        let dropped = cache.len();
        cache.clear();
        self.stats.reset();
        debug!(dropped, "cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedCache::new(10).unwrap();

        assert_eq!(cache.set(1u64, b"test data".to_vec()), None);
        let data = cache.get(&1).unwrap();

        assert_eq!(data, b"test data");
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_shared_rejects_zero_capacity() {
        let result = SharedCache::<u64, u64>::new(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_shared_not_found() {
        let cache = SharedCache::<u64, u64>::new(10).unwrap();

        let result = cache.get(&7);
        assert!(matches!(result, Err(Error::NotFound)));
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_shared_eviction() {
        let cache = SharedCache::new(2).unwrap();

        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.set("c", 3), Some(1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 1);

        assert_eq!(cache.get("b"), Ok(2));
        assert_eq!(cache.get("c"), Ok(3));
        assert_eq!(cache.get("a"), Err(Error::NotFound));
        assert_eq!(cache.stats().hits(), 2);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_shared_update() {
        let cache = SharedCache::new(2).unwrap();

        cache.set("a", 1);
        assert_eq!(cache.set("a", 2), None);

        assert_eq!(cache.get("a"), Ok(2));
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.stats().updates(), 1);
    }

    #[test]
    fn test_shared_remove() {
        let cache = SharedCache::new(4).unwrap();

        cache.set(1, "one");

        assert!(cache.contains(&1));
        assert_eq!(cache.remove(&1), Some("one"));
        assert!(!cache.contains(&1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_clear() {
        let cache = SharedCache::new(10).unwrap();

        cache.set(0, "data 0");
        cache.set(1, "data 1");
        cache.get(&0).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 10);
        assert_eq!(cache.stats().hits(), 0);
        assert_eq!(cache.get(&0), Err(Error::NotFound));
    }

    #[test]
    fn test_shared_key_without_clone() {
        #[derive(Hash, PartialEq, Eq)]
        struct Path(String);

        let cache = SharedCache::new(1).unwrap();

        assert_eq!(cache.set(Path("/a".to_string()), 1), None);
        assert_eq!(cache.get(&Path("/a".to_string())), Ok(1));
        assert_eq!(cache.set(Path("/b".to_string()), 2), Some(1));
        assert!(!cache.contains(&Path("/a".to_string())));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedCache::new(64).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        cache.set(t * 1000 + i, i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 64);
        assert_eq!(cache.stats().inserts(), 400);
        assert_eq!(cache.stats().evictions(), 400 - 64);
    }
}
