//! Shared Cache Module
//!
//! Thread-safe handle around [`LruCache`]. Every call runs as a single short
//! critical section, so concurrent callers observe some serial order of
//! operations and never a half-updated index or recency list.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{CacheStats, InvariantViolation, LruCache};

// == Shared Cache ==
/// Cloneable handle to one process-wide LRU cache.
///
/// Clones share the same underlying cache. Reads take the same exclusive lock
/// as writes because a hit reorders the recency list.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<LruCache<K, V>>>,
    /// Fixed at construction, readable without the lock
    capacity: usize,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
        }
    }
}

impl<K, V> std::fmt::Debug for SharedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
            capacity,
        }
    }

    // == Get ==
    /// Returns a copy of the cached value and marks the key most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    // == Put ==
    /// Inserts or replaces the value for `key`, evicting the least recently
    /// used entry when a new key arrives at capacity.
    pub fn put(&self, key: K, value: V) {
        let evicted = self.inner.lock().put(key, value);
        // Dropped outside the lock
        if evicted.is_some() {
            trace!("Evicted least recently used cache entry");
        }
    }

    // == Delete ==
    /// Removes `key` if resident. Absent keys are silently accepted.
    pub fn delete(&self, key: &K) {
        self.inner.lock().delete(key);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        self.inner.lock().keys_mru()
    }

    /// Runs the structural consistency check under the lock.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.inner.lock().check_invariants()
    }
}
