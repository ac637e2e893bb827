//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::cache::JsonCache;
pub use crate::errors::CacheError;
pub use crate::memory::MemoryStore;
pub use crate::redis_store::RedisStore;
pub use crate::store::KeyValueStore;

// Re-export centralized config
pub use config::CacheConfig;

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;
