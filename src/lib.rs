//! # jsoncache
//!
//! A namespaced JSON cache over Redis for memoizing expensive work.
//! Values go in as any `Serialize` type and come back as any `Deserialize` type,
//! with a per-entry TTL and a global enable switch. When caching is disabled,
//! or Redis is not reachable at startup, every operation becomes a no-op so
//! callers fall through to the slow path.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jsoncache::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CacheConfig::new(
//!         true,
//!         "localhost".to_string(),
//!         "6379".to_string(),
//!         String::new(),
//!         0,
//!         300,
//!     );
//!
//!     let (cache, probe_error) = JsonCache::connect(&config, "app").await;
//!     if let Some(e) = probe_error {
//!         eprintln!("running without cache: {}", e);
//!     }
//!
//!     cache.set("user:1", &User { name: "a".to_string() }, Duration::ZERO).await?;
//!     let user: Option<User> = cache.get("user:1").await?;
//!     println!("{:?}", user);
//!
//!     cache.delete(["user:1"]).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::{connect_from_env, connect_from_file};
pub use errors::JsonCacheError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig};

// Re-export internal crates
pub use cache_system;
pub use cache_system::{CacheError, JsonCache, KeyValueStore, MemoryStore, RedisStore};
pub use cache_system::{debug_log, trace_log};

// Re-export external dependencies used in public API
pub use async_trait;
pub use tracing;
