//! Error types for the key-value service
//!
//! Provides unified error handling using thiserror. The cache itself never
//! fails; these errors come from request validation and the durable store.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == App Error Enum ==
/// Unified error type for the key-value service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Key is absent from the durable store
    #[error("Key {0} is not present")]
    NotFound(i64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable store failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No durable-store connection became available
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(err) => {
                error!("Durable store error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to execute query".to_string(),
                )
            }
            AppError::Pool(err) => {
                error!("Durable store pool error: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Durable store unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value service.
pub type Result<T> = std::result::Result<T, AppError>;
