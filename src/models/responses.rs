//! Response DTOs for the key-value API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Where a GET answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Cache,
    Store,
}

/// Response body for GET/POST /get
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: i64,
    pub value: String,
    pub source: ValueSource,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: i64, value: impl Into<String>, source: ValueSource) -> Self {
        Self {
            key,
            value: value.into(),
            source,
        }
    }
}

/// Response body for POST /put
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    pub key: i64,
    pub value: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            message: format!("Key {} value {} created/updated", key, value),
            key,
            value,
        }
    }
}

/// Response body for POST /delete
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub key: i64,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: i64) -> Self {
        Self {
            message: format!("Key-Value pair for key {} has been deleted", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub updates: u64,
    pub evictions: u64,
    pub removals: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            insertions: stats.insertions,
            updates: stats.updates,
            evictions: stats.evictions,
            removals: stats.removals,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
