//! Error types for the jsoncache crate
//!
//! This module contains the errors returned while setting a cache up from configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonCacheError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache_system::CacheError),
}
