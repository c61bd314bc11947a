//! Cache Entry Module
//!
//! Defines a single cached key/value association.

// == Cache Entry ==
/// A single resident association in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    /// The lookup key
    pub key: K,
    /// The cached value
    pub value: V,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}
