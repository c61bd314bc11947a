//! kvcache - A key-value HTTP service with an in-memory LRU cache
//!
//! Serves get/put/delete over HTTP. SQLite is the source of truth; a
//! fixed-capacity, thread-safe LRU cache sits in front of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::SharedCache;
pub use config::Config;
