//! Integration tests for the JSON cache adapter
//!
//! Runs the adapter against the in-memory store so no Redis server is needed.

use chrono::{DateTime, TimeZone, Utc};
use jsoncache::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    id: Uuid,
    name: String,
    tags: Vec<String>,
    last_seen: DateTime<Utc>,
}

fn sample_profile() -> Profile {
    Profile {
        id: Uuid::new_v4(),
        name: "a".to_string(),
        tags: vec!["admin".to_string(), "beta".to_string()],
        last_seen: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn local_config() -> CacheConfig {
    CacheConfig::new(
        true,
        "localhost".to_string(),
        "6379".to_string(),
        String::new(),
        0,
        300,
    )
}

async fn active_cache(store: &Arc<MemoryStore>, namespace: &str) -> JsonCache {
    let (cache, error) = JsonCache::with_store(store.clone(), &local_config(), namespace).await;
    assert!(error.is_none(), "probe against memory store failed: {:?}", error);
    cache
}

#[tokio::test]
async fn test_disabled_config_scenario() {
    let config = CacheConfig {
        enabled: false,
        ..local_config()
    };

    let (cache, error) = JsonCache::connect(&config, "app").await;
    assert!(error.is_none());
    assert!(!cache.is_active());
}

#[tokio::test]
async fn test_set_get_delete_scenario() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "app").await;

    cache
        .set("user:1", &json!({"name": "a"}), Duration::ZERO)
        .await
        .unwrap();

    let found: Option<serde_json::Value> = cache.get("user:1").await.unwrap();
    assert_eq!(found, Some(json!({"name": "a"})));
    assert_eq!(
        store.raw("app:user:1").await,
        Some(r#"{"name":"a"}"#.to_string())
    );

    cache.delete(["user:1"]).await.unwrap();
    let found: Option<serde_json::Value> = cache.get("user:1").await.unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_typed_values_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "profiles").await;
    let profile = sample_profile();
    let key = format!("profile:{}", profile.id);

    cache.set(&key, &profile, Duration::from_secs(60)).await.unwrap();
    assert_eq!(cache.get::<Profile>(&key).await.unwrap(), Some(profile));

    let list = vec![1u32, 2, 3];
    cache.set("list", &list, Duration::ZERO).await.unwrap();
    assert_eq!(cache.get::<Vec<u32>>("list").await.unwrap(), Some(list));
}

#[tokio::test]
async fn test_inactive_cache_hides_existing_entries() {
    let store = Arc::new(MemoryStore::new());
    store.insert_raw("app:user:1", r#"{"name":"a"}"#).await;

    // Same store, but the adapter was disabled by configuration
    let config = CacheConfig {
        enabled: false,
        ..local_config()
    };
    let (cache, _) = JsonCache::with_store(store.clone(), &config, "app").await;

    let found: Option<serde_json::Value> = cache.get("user:1").await.unwrap();
    assert_eq!(found, None);
    cache.delete(["user:1"]).await.unwrap();
    cache.set("user:2", &1, Duration::ZERO).await.unwrap();

    assert_eq!(store.operations(), 0);
    assert_eq!(store.keys().await, vec!["app:user:1".to_string()]);
}

#[tokio::test]
async fn test_namespaces_do_not_collide() {
    let store = Arc::new(MemoryStore::new());
    let orders = active_cache(&store, "orders").await;
    let users = active_cache(&store, "users").await;

    orders.set("42", &"order", Duration::ZERO).await.unwrap();
    users.set("42", &"user", Duration::ZERO).await.unwrap();

    assert_eq!(orders.get::<String>("42").await.unwrap().as_deref(), Some("order"));
    assert_eq!(users.get::<String>("42").await.unwrap().as_deref(), Some("user"));

    users.delete(["42"]).await.unwrap();
    assert_eq!(orders.get::<String>("42").await.unwrap().as_deref(), Some("order"));
    assert_eq!(users.get::<String>("42").await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_namespace_uses_raw_keys() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "").await;

    cache.set("plain", &true, Duration::ZERO).await.unwrap();
    assert_eq!(store.keys().await, vec!["plain".to_string()]);
}

#[tokio::test]
async fn test_shape_mismatch_is_not_silently_defaulted() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "app").await;

    cache.set("n", &json!({"count": "seven"}), Duration::ZERO).await.unwrap();

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Counter {
        count: u64,
    }

    let result = cache.get::<Counter>("n").await;
    assert!(matches!(result, Err(CacheError::Deserialization { .. })));
}

#[tokio::test]
async fn test_overwrite_resets_value_and_ttl() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "app").await;

    cache.set("k", &1, Duration::from_secs(5)).await.unwrap();
    cache.set("k", &2, Duration::from_secs(600)).await.unwrap();

    assert_eq!(cache.get::<i32>("k").await.unwrap(), Some(2));
    assert!(store.ttl("app:k").await.unwrap() > Duration::from_secs(500));
}

#[tokio::test]
async fn test_clones_share_the_store_across_tasks() {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "app").await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .set(&format!("item:{}", i), &i, Duration::ZERO)
                    .await
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.keys().await.len(), 8);
    assert_eq!(cache.get::<i32>("item:3").await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_memoized_computation() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let cache = active_cache(&store, "reports").await;

    let build = || async { anyhow::Ok(json!({"total": 1234})) };
    let first = cache.get_or_insert_with("daily", Duration::ZERO, build).await?;
    let second: serde_json::Value = cache
        .get_or_insert_with("daily", Duration::ZERO, || async {
            anyhow::bail!("should have been served from cache")
        })
        .await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_connect_from_file_with_disabled_cache() {
    let path = std::env::temp_dir().join(format!("jsoncache-{}.toml", Uuid::new_v4()));
    std::fs::write(&path, "[cache]\nenabled = false\n").unwrap();

    let cache = connect_from_file(&path, "app").await.unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(!cache.is_active());
    assert_eq!(cache.namespace(), "app");
    assert_eq!(cache.default_ttl(), Duration::from_secs(300));
}

#[tokio::test]
async fn test_connect_from_file_rejects_invalid_config() {
    let path = std::env::temp_dir().join(format!("jsoncache-{}.toml", Uuid::new_v4()));
    std::fs::write(&path, "[cache]\nenabled = true\nport = \"abc\"\n").unwrap();

    let result = connect_from_file(&path, "app").await;
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(JsonCacheError::Config(_))));
}

#[tokio::test]
async fn test_unreachable_redis_degrades_to_inactive() {
    // Port 1 on loopback refuses connections
    let config = CacheConfig {
        port: "1".to_string(),
        probe_timeout_ms: 500,
        ..local_config()
    };

    let cache = JsonCache::connect_or_disable(&config, "app").await;
    assert!(!cache.is_active());
    assert_eq!(cache.get::<i32>("anything").await.unwrap(), None);
    cache.set("anything", &1, Duration::ZERO).await.unwrap();
}
