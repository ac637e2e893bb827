//! Backing store abstraction
//!
//! The cache adapter only needs four things from a key-value store:
//! a reachability check, reads, expiring writes and bulk deletes.

use crate::errors::CacheError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Key-value store the cache writes JSON payloads into.
///
/// Implementations must be safe to share between tasks; the adapter holds a
/// single handle and uses it concurrently.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Connect if needed and check the store answers.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Fetch the payload stored under `key`, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `payload` under `key`, replacing any previous value.
    /// `ttl == None` stores the entry without expiry.
    async fn set(&self, key: &str, payload: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove all `keys` in one request. Absent keys are ignored.
    /// Returns how many entries were actually removed.
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;
}
