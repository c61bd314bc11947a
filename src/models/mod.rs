//! Request and Response models for the key-value API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeyQuery, KeyRequest, PutRequest, MAX_VALUE_SIZE};
pub use responses::{
    DeleteResponse, GetResponse, HealthResponse, PutResponse, StatsResponse, ValueSource,
};
