//! Startup helpers
//!
//! Build a [`JsonCache`] straight from the configuration file and environment.
//! A broken configuration is an error; an unreachable store is not, the cache
//! just comes up inactive.

use std::path::Path;

use cache_system::JsonCache;
use config::AppConfig;

use crate::errors::JsonCacheError;

/// Load [`AppConfig`] (file, `.env`, `REDIS_*`/`CACHE_*` overrides) and build a
/// cache for `namespace`.
pub async fn connect_from_env(namespace: &str) -> Result<JsonCache, JsonCacheError> {
    let config = AppConfig::load()?;
    Ok(JsonCache::connect_or_disable(&config.cache, namespace).await)
}

/// Same as [`connect_from_env`] but reads the given TOML file only.
pub async fn connect_from_file<P: AsRef<Path>>(
    path: P,
    namespace: &str,
) -> Result<JsonCache, JsonCacheError> {
    let config = AppConfig::from_file(path)?;
    Ok(JsonCache::connect_or_disable(&config.cache, namespace).await)
}
