//! JSON cache adapter
//!
//! [`JsonCache`] stores serde values as JSON text under namespaced keys.
//! A cache built from a disabled configuration, or one whose store failed the
//! startup probe, stays inactive for its whole lifetime: reads miss and writes
//! are dropped without touching the network.

use crate::errors::CacheError;
use crate::redis_store::RedisStore;
use crate::store::KeyValueStore;
use config::CacheConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
enum Mode {
    Active(Arc<dyn KeyValueStore>),
    Inactive,
}

/// Namespaced JSON cache over a key-value store
#[derive(Clone)]
pub struct JsonCache {
    mode: Mode,
    default_ttl: Duration,
    namespace: String,
}

impl Debug for JsonCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("JsonCache");
        debug
            .field("namespace", &self.namespace)
            .field("default_ttl", &self.default_ttl);
        match &self.mode {
            Mode::Active(store) => debug.field("store", store),
            Mode::Inactive => debug.field("store", &"inactive"),
        };
        debug.finish()
    }
}

impl JsonCache {
    /// Connect to the Redis server described by `config`.
    ///
    /// Always yields a usable cache. When the probe fails the cache is inactive
    /// and the failure is handed back so the caller can report it.
    pub async fn connect(
        config: &CacheConfig,
        namespace: impl Into<String>,
    ) -> (Self, Option<CacheError>) {
        let namespace = namespace.into();
        if !config.enabled {
            debug_log!("Cache '{}' disabled by configuration", namespace);
            return (Self::inactive(config.default_ttl(), namespace), None);
        }

        match RedisStore::new(config) {
            Ok(store) => Self::with_store(Arc::new(store), config, namespace).await,
            Err(e) => (Self::inactive(config.default_ttl(), namespace), Some(e)),
        }
    }

    /// Like [`JsonCache::connect`], but logs a probe failure and carries on
    /// with an inactive cache.
    pub async fn connect_or_disable(config: &CacheConfig, namespace: impl Into<String>) -> Self {
        let (cache, error) = Self::connect(config, namespace).await;
        if let Some(e) = error {
            tracing::warn!(
                "Cache '{}' unavailable at {}, continuing without caching: {}",
                cache.namespace,
                config.address(),
                e
            );
        }
        cache
    }

    /// Build a cache over an arbitrary store, probing it first.
    pub async fn with_store<S>(
        store: Arc<S>,
        config: &CacheConfig,
        namespace: impl Into<String>,
    ) -> (Self, Option<CacheError>)
    where
        S: KeyValueStore + 'static,
    {
        let namespace = namespace.into();
        let default_ttl = config.default_ttl();
        if !config.enabled {
            return (Self::inactive(default_ttl, namespace), None);
        }

        let probe_timeout = config.probe_timeout();
        let probe = match tokio::time::timeout(probe_timeout, store.ping()).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(probe_timeout)),
        };

        match probe {
            Ok(()) => {
                debug_log!("Cache '{}' active", namespace);
                let store: Arc<dyn KeyValueStore> = store;
                let cache = Self {
                    mode: Mode::Active(store),
                    default_ttl,
                    namespace,
                };
                (cache, None)
            }
            Err(e) => (Self::inactive(default_ttl, namespace), Some(e)),
        }
    }

    /// A cache that never stores anything
    pub fn disabled(namespace: impl Into<String>) -> Self {
        Self::inactive(Duration::ZERO, namespace.into())
    }

    fn inactive(default_ttl: Duration, namespace: String) -> Self {
        Self {
            mode: Mode::Inactive,
            default_ttl,
            namespace,
        }
    }

    /// Whether operations reach the store
    pub fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Active(_))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Full store key for a logical key
    pub fn namespaced_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.namespace, key)
        }
    }

    /// A zero TTL means "use the default"; a zero default means no expiry.
    fn resolve_ttl(&self, ttl: Duration) -> Option<Duration> {
        let ttl = if ttl.is_zero() { self.default_ttl } else { ttl };
        (!ttl.is_zero()).then_some(ttl)
    }

    /// Read and decode the value stored under `key`.
    ///
    /// `Ok(None)` covers both a miss and an inactive cache. A stored payload
    /// that does not decode as `T` is an error, never a default value.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let Mode::Active(store) = &self.mode else {
            return Ok(None);
        };

        let cache_key = self.namespaced_key(key);
        let Some(json_str) = store.get(&cache_key).await? else {
            trace_log!("Cache miss: {}", cache_key);
            return Ok(None);
        };

        let value = serde_json::from_str(&json_str).map_err(|source| {
            CacheError::Deserialization {
                key: cache_key.clone(),
                source,
            }
        })?;
        trace_log!("Cache hit: {}", cache_key);
        Ok(Some(value))
    }

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// `ttl` of zero uses the cache's default TTL. Overwrites any existing
    /// entry and resets its expiry.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let Mode::Active(store) = &self.mode else {
            return Ok(());
        };

        let cache_key = self.namespaced_key(key);
        let json_str = serde_json::to_string(value).map_err(|source| {
            CacheError::Serialization {
                key: cache_key.clone(),
                source,
            }
        })?;
        let ttl = self.resolve_ttl(ttl);

        store.set(&cache_key, &json_str, ttl).await?;
        trace_log!("Cache set: {} (ttl {:?})", cache_key, ttl);
        Ok(())
    }

    /// Remove `keys` with a single bulk request. Missing keys are fine.
    pub async fn delete<I, K>(&self, keys: I) -> Result<(), CacheError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let Mode::Active(store) = &self.mode else {
            return Ok(());
        };

        let cache_keys: Vec<String> = keys
            .into_iter()
            .map(|key| self.namespaced_key(key.as_ref()))
            .collect();
        if cache_keys.is_empty() {
            return Ok(());
        }

        let deleted = store.delete(&cache_keys).await?;
        debug_log!(
            "Cache delete in '{}': {} of {} keys removed",
            self.namespace,
            deleted,
            cache_keys.len()
        );
        Ok(())
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// Cache failures never fail the call: a broken read is treated as a miss
    /// and a failed write is logged. Only `compute` errors are returned.
    pub async fn get_or_insert_with<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry '{}': {}", key, e);
            }
        }

        let value = compute().await?;
        if let Err(e) = self.set(key, &value, ttl).await {
            tracing::warn!("Failed to cache '{}': {}", key, e);
        }
        Ok(value)
    }
}
