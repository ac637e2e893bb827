//! Cache system for Redis-based JSON caching
//!
//! This crate provides a namespaced JSON cache over a key-value store,
//! with a Redis store for production and an in-memory store for tests.

/// Conditional debug logging macros
/// These macros only emit events when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

pub mod cache;
pub mod errors;
pub mod memory;
pub mod prelude;
pub mod redis_store;
pub mod store;

// Re-export centralized config
pub use config::CacheConfig;

pub use cache::JsonCache;
pub use errors::CacheError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::KeyValueStore;

// Used by the logging macros from other crates
#[doc(hidden)]
pub use tracing;
