//! Redis store implementation
//!
//! This module provides the RedisStore struct
//! for Redis operations and connection management.

use crate::errors::CacheError;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use config::CacheConfig;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, IntoConnectionInfo};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Redis-backed key-value store
#[derive(Clone)]
pub struct RedisStore {
    client: Arc<Client>,
    address: String,
    db: i64,
    connection_pool: Arc<RwLock<Option<MultiplexedConnection>>>,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = {
            match self.connection_pool.try_read() {
                Ok(pool) => {
                    if pool.is_some() {
                        "connected"
                    } else {
                        "no_connection"
                    }
                }
                Err(_) => "lock_error",
            }
        };

        f.debug_struct("RedisStore")
            .field("address", &self.address)
            .field("db", &self.db)
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisStore {
    /// Create a client handle for the configured address.
    ///
    /// No network traffic happens here; the first command (usually `ping`)
    /// opens the connection.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let address = config.address();
        let host = config.host.trim();
        let port = config
            .port_number()
            .filter(|_| !host.is_empty())
            .ok_or_else(|| CacheError::InvalidAddress(address.clone()))?;

        let mut connection_info = (host.to_string(), port).into_connection_info()?;
        connection_info.redis.db = config.db;
        connection_info.redis.password = config.password().map(str::to_string);
        let client = Client::open(connection_info)?;

        Ok(Self {
            client: Arc::new(client),
            address,
            db: config.db,
            connection_pool: Arc::new(RwLock::new(None)),
        })
    }

    /// `host:port` this store talks to
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get or create Redis connection
    ///
    /// The lock is never held while connecting, so a slow reconnect does not
    /// stall callers. Racing openers keep whichever connection landed first.
    async fn get_connection(&self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(connection) = self.connection_pool.read().await.as_ref() {
            return Ok(connection.clone());
        }

        trace_log!("Opening Redis connection to {}", self.address);
        let connection = self.client.get_multiplexed_async_connection().await?;

        let mut pool = self.connection_pool.write().await;
        Ok(pool.get_or_insert(connection).clone())
    }

    /// Drop a cached connection that the server or network has closed,
    /// so the next call opens a fresh one.
    async fn forget_broken_connection(&self, error: &redis::RedisError) {
        if error.is_connection_dropped() || error.is_io_error() || error.is_connection_refusal() {
            debug_log!("Discarding Redis connection to {}: {}", self.address, error);
            *self.connection_pool.write().await = None;
        }
    }

    async fn checked<T>(&self, result: redis::RedisResult<T>) -> Result<T, CacheError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                self.forget_broken_connection(&e).await;
                Err(e.into())
            }
        }
    }
}

/// PSETEX wants whole milliseconds and rejects zero.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;

        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        self.checked(pong).await?;
        trace_log!("Redis at {} answered PING", self.address);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.get_connection().await?;

        let cached_data: redis::RedisResult<Option<String>> = conn.get(key).await;
        self.checked(cached_data).await
    }

    async fn set(&self, key: &str, payload: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.get_connection().await?;

        let result: redis::RedisResult<()> = match ttl {
            Some(ttl) => conn.pset_ex(key, payload, ttl_millis(ttl)).await,
            None => conn.set(key, payload).await,
        };
        self.checked(result).await
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_connection().await?;
        let deleted: redis::RedisResult<u64> = conn.del(keys).await;
        self.checked(deleted).await
    }
}
