//! In-process store
//!
//! A `HashMap` behind a lock that behaves like the Redis store for the
//! operations the cache uses. Handy for tests and for running without Redis.

use crate::errors::CacheError;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-memory key-value store with TTL support
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
    operations: AtomicU64,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails, as if the server were down
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Number of calls made through [`KeyValueStore`] so far
    pub fn operations(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }

    /// Write a payload directly, bypassing any cache namespacing
    pub async fn insert_raw(&self, key: &str, payload: &str) {
        self.entries.write().await.insert(
            key.to_string(),
            MemoryEntry {
                payload: payload.to_string(),
                expires_at: None,
            },
        );
    }

    /// Read a live payload directly by its full key
    pub async fn raw(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.payload.clone())
    }

    /// Remaining time to live of a key, `None` if absent or persistent
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Full keys of all live entries, sorted
    pub async fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn record_call(&self) -> Result<(), CacheError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(CacheError::Backend("store unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn ping(&self) -> Result<(), CacheError> {
        self.record_call()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.record_call()?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, payload: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.record_call()?;

        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.entries.write().await.insert(
            key.to_string(),
            MemoryEntry {
                payload: payload.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        self.record_call()?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let deleted = keys
            .iter()
            .filter_map(|key| entries.remove(key))
            .filter(|entry| entry.is_live(now))
            .count();
        Ok(deleted as u64)
    }
}
