//! API Routes
//!
//! Configures the Axum router with all key-value service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, get_query_handler, health_handler, hello_handler, put_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /hello` - Liveness greeting
/// - `POST /put` - Upsert a key-value pair
/// - `POST /get` - Look up a key given in the JSON body
/// - `GET /get?key=N` - Look up a key given in the query string
/// - `POST /delete` - Delete a key
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/hello", get(hello_handler))
        .route("/put", post(put_handler))
        .route("/get", get(get_query_handler).post(get_handler))
        .route("/delete", post(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
