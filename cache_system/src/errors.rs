//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! while talking to the backing store or converting cached payloads.

use std::time::Duration;
use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Cache liveness probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid cache address: {0}")]
    InvalidAddress(String),

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize cached value for key '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache backend error: {0}")]
    Backend(String),
}
