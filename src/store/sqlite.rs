//! SQLite Store
//!
//! [`DurableStore`] over a single SQLite table, with split read/write
//! connection pools.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::error::Result;
use crate::store::DurableStore;

// == Pool Configuration ==
/// SQLite allows one writer at a time
const WRITE_POOL_MAX_SIZE: u32 = 1;
/// Concurrent cache misses each need a reader
const READ_POOL_MAX_SIZE: u32 = 16;
const POOL_MIN_IDLE: u32 = 1;
const CONNECTION_TIMEOUT_MS: u64 = 30_000;
const BUSY_TIMEOUT_MS: u64 = 30_000;

type SqlitePool = Pool<SqliteConnectionManager>;
type SqliteConnection = PooledConnection<SqliteConnectionManager>;

// == SQLite Store ==
/// SQLite-backed key-value table.
///
/// Writes go through a single-connection pool; reads draw from a larger pool
/// so misses on different keys run side by side under WAL.
pub struct SqliteStore {
    write_pool: SqlitePool,
    read_pool: SqlitePool,
}

impl SqliteStore {
    // == Constructors ==
    /// Opens (or creates) the database file at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let write_pool = build_pool(
            SqliteConnectionManager::file(path).with_init(configure_connection),
            WRITE_POOL_MAX_SIZE,
        )?;
        // Schema must exist before readers connect
        create_schema(&*write_pool.get()?)?;

        let read_pool = build_pool(
            SqliteConnectionManager::file(path).with_init(configure_connection),
            READ_POOL_MAX_SIZE,
        )?;

        info!("Durable store opened at {}", path.display());
        Ok(Self {
            write_pool,
            read_pool,
        })
    }

    /// Opens a private in-memory database.
    ///
    /// Every in-memory connection is its own database, so reads and writes
    /// share one single-connection pool.
    pub fn open_in_memory() -> Result<Self> {
        // Idle connections must never be recycled or the data goes with them
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_millis(CONNECTION_TIMEOUT_MS))
            .build(SqliteConnectionManager::memory())?;
        create_schema(&*pool.get()?)?;

        Ok(Self {
            write_pool: pool.clone(),
            read_pool: pool,
        })
    }

    fn reader(&self) -> Result<SqliteConnection> {
        Ok(self.read_pool.get()?)
    }

    fn writer(&self) -> Result<SqliteConnection> {
        Ok(self.write_pool.get()?)
    }
}

fn build_pool(manager: SqliteConnectionManager, max_size: u32) -> Result<SqlitePool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(POOL_MIN_IDLE.min(max_size)))
        .connection_timeout(Duration::from_millis(CONNECTION_TIMEOUT_MS))
        .build(manager)?;
    Ok(pool)
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    Ok(())
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS key_value (
            id INTEGER PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
        [],
    )?;
    Ok(())
}

impl DurableStore for SqliteStore {
    fn get(&self, id: i64) -> Result<Option<String>> {
        let conn = self.reader()?;
        let value = conn
            .query_row(
                "SELECT value FROM key_value WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, id: i64, value: &str) -> Result<()> {
        let conn = self.writer()?;
        conn.execute(
            r#"
            INSERT INTO key_value (id, value) VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET value = excluded.value
            "#,
            params![id, value],
        )?;
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.writer()?;
        let affected = conn.execute("DELETE FROM key_value WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
