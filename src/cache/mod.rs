//! Cache Module
//!
//! Provides a fixed-capacity in-memory LRU cache that is safe to share
//! between request handlers.

mod entry;
mod lru;
mod shared;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{InvariantViolation, Iter, LruCache};
pub use shared::SharedCache;
pub use stats::CacheStats;
