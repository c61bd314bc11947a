//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

const DEFAULT_CACHE_CAPACITY: usize = 10;
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "kv_store.db";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold (always > 0)
    pub cache_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
    /// SQLite database file
    pub database_path: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 10, zero falls back to default)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `DATABASE_PATH` - SQLite database file (default: kv_store.db)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: parse_var::<usize>("CACHE_CAPACITY")
                .filter(|&c| c > 0)
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            database_path: env::var("DATABASE_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            server_port: DEFAULT_SERVER_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}
