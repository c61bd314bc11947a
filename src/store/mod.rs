//! Durable Store Module
//!
//! The authoritative key-value table that the cache accelerates.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;

// == Durable Store ==
/// Blocking key-value persistence keyed by integer id.
///
/// Implementations are shared across request handlers and called from
/// tokio's blocking pool.
pub trait DurableStore: Send + Sync {
    /// Returns the stored value, or `None` if the id has no row.
    fn get(&self, id: i64) -> Result<Option<String>>;

    /// Inserts the row or replaces its value.
    fn put(&self, id: i64, value: &str) -> Result<()>;

    /// Deletes the row. Returns `true` when a row was removed.
    fn delete(&self, id: i64) -> Result<bool>;
}
