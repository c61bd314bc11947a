//! API Module
//!
//! HTTP handlers and routing for the key-value service.
//!
//! # Endpoints
//! - `GET /hello` - Liveness greeting
//! - `POST /put` - Upsert a key-value pair
//! - `POST /get`, `GET /get?key=N` - Look up a key
//! - `POST /delete` - Delete a key
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
