//! Convenience re-exports for common jsoncache usage
//!
//! # Example
//!
//! ```rust
//! use jsoncache::prelude::*;
//!
//! let cache = JsonCache::disabled("app");
//! assert!(!cache.is_active());
//! ```

// Startup helpers
pub use crate::core::{connect_from_env, connect_from_file};
pub use crate::errors::JsonCacheError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig};

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
