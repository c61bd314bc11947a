//! API Handlers
//!
//! HTTP request handlers for each endpoint. Reads go to the cache first and
//! fall back to the durable store; writes and deletes go to the durable store
//! first and only touch the cache once the store has confirmed them.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeyQuery, KeyRequest, PutRequest, PutResponse,
    StatsResponse, ValueSource,
};
use crate::store::{DurableStore, SqliteStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide LRU cache keyed by the integer id
    pub cache: SharedCache<i64, String>,
    /// Source of truth
    pub store: Arc<dyn DurableStore>,
}

impl AppState {
    /// Creates a new AppState from an existing cache and store.
    pub fn new(cache: SharedCache<i64, String>, store: Arc<dyn DurableStore>) -> Self {
        Self { cache, store }
    }

    /// Opens the configured SQLite database and builds a cache of the
    /// configured capacity.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SqliteStore::open(&config.database_path)?;
        Ok(Self::new(
            SharedCache::new(config.cache_capacity),
            Arc::new(store),
        ))
    }

    /// Runs a blocking store call on tokio's blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn DurableStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| AppError::Internal(format!("Store task failed: {}", e)))?
    }

    /// Cache-first lookup with read-through on miss.
    async fn lookup(&self, key: i64) -> Result<GetResponse> {
        if let Some(value) = self.cache.get(&key) {
            debug!("Cache hit for key {}", key);
            return Ok(GetResponse::new(key, value, ValueSource::Cache));
        }

        debug!("Cache miss for key {}", key);
        let value = self
            .with_store(move |store| store.get(key))
            .await?
            .ok_or(AppError::NotFound(key))?;

        self.cache.put(key, value.clone());
        Ok(GetResponse::new(key, value, ValueSource::Store))
    }
}

/// Handler for GET /hello
pub async fn hello_handler() -> &'static str {
    "hello"
}

/// Handler for POST /put
///
/// Upserts the pair into the durable store, then into the cache.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let PutRequest { key, value } = req;
    let stored = value.clone();
    state
        .with_store(move |store| store.put(key, &stored))
        .await?;

    state.cache.put(key, value.clone());
    debug!("Stored key {}", key);

    Ok(Json(PutResponse::new(key, value)))
}

/// Handler for POST /get with a JSON body
pub async fn get_handler(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<GetResponse>> {
    state.lookup(req.key).await.map(Json)
}

/// Handler for GET /get?key=N
pub async fn get_query_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<GetResponse>> {
    state.lookup(query.key).await.map(Json)
}

/// Handler for POST /delete
///
/// The cache entry is dropped only after the store has answered. A key the
/// store no longer holds is dropped too, so a stale read-through can be cleared.
pub async fn delete_handler(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<DeleteResponse>> {
    let key = req.key;
    let removed = state.with_store(move |store| store.delete(key)).await?;
    state.cache.delete(&key);
    if !removed {
        return Err(AppError::NotFound(key));
    }
    debug!("Deleted key {}", key);

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
