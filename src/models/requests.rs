//! Request DTOs for the key-value API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.
//! Field names also accept their capitalised form (`Key`, `Value`), which is
//! what untagged Go clients emit.

use serde::Deserialize;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Request body for POST /put
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    #[serde(alias = "Key")]
    pub key: i64,
    #[serde(alias = "Value")]
    pub value: String,
}

impl PutRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

/// Request body for POST /get and POST /delete
///
/// Any `value` field sent along is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRequest {
    #[serde(alias = "Key")]
    pub key: i64,
}

/// Query string for GET /get?key=N
#[derive(Debug, Clone, Deserialize)]
pub struct KeyQuery {
    pub key: i64,
}
