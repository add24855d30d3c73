//! Tests for the in-memory key-value store.

use pronouns_store::{KeyValueStore, MemoryStore, PutOptions, get_json, put_json};
use std::collections::BTreeMap;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_put_get_delete() {
    let store = MemoryStore::new();

    store
        .put("guild-config:1", "{}".to_string(), PutOptions::default())
        .await
        .unwrap();
    assert_eq!(store.get("guild-config:1").await.unwrap(), Some("{}".to_string()));

    store.delete("guild-config:1").await.unwrap();
    assert_eq!(store.get("guild-config:1").await.unwrap(), None);

    // Deleting again is a no-op
    store.delete("guild-config:1").await.unwrap();
}

#[tokio::test]
async fn test_list_is_prefix_scoped() {
    let store = MemoryStore::new();
    for key in ["roles:1:any", "roles:1:ask", "roles:10:any", "roles:2:he_him"] {
        store.put(key, "r".to_string(), PutOptions::default()).await.unwrap();
    }

    let keys = store.list("roles:1:").await.unwrap();
    assert_eq!(keys, vec!["roles:1:any".to_string(), "roles:1:ask".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_expiry() {
    let store = MemoryStore::new();
    store
        .put(
            "user-roles:1:2",
            "[\"3\"]".to_string(),
            PutOptions::with_ttl(Duration::from_secs(300)),
        )
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(299)).await;
    assert!(store.get("user-roles:1:2").await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(store.get("user-roles:1:2").await.unwrap().is_none());
    assert!(store.list("user-roles:").await.unwrap().is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_writes_evict_expired_records() {
    let store = MemoryStore::new();
    let short = PutOptions::with_ttl(Duration::from_secs(15));
    store.put("ratelimits:1", "{}".to_string(), short).await.unwrap();
    store.put("ratelimits:2", "{}".to_string(), short).await.unwrap();

    tokio::time::advance(Duration::from_secs(16)).await;
    store.put("ratelimits:3", "{}".to_string(), short).await.unwrap();

    // The write above already dropped both stale counters.
    assert_eq!(store.purge_expired().await, 0);
    assert_eq!(store.list("ratelimits:").await.unwrap(), vec!["ratelimits:3".to_string()]);

    tokio::time::advance(Duration::from_secs(16)).await;
    assert_eq!(store.purge_expired().await, 1);
}

#[tokio::test]
async fn test_json_helpers() {
    let store = MemoryStore::new();
    let mut value = BTreeMap::new();
    value.insert("calls".to_string(), 3);

    put_json(&store, "ratelimits:9", &value, PutOptions::default())
        .await
        .unwrap();
    let read: Option<BTreeMap<String, i32>> = get_json(&store, "ratelimits:9").await.unwrap();
    assert_eq!(read, Some(value));

    let missing: Option<BTreeMap<String, i32>> = get_json(&store, "ratelimits:10").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_json_decode_failure_is_error() {
    let store = MemoryStore::new();
    store
        .put("guild-config:1", "not json".to_string(), PutOptions::default())
        .await
        .unwrap();

    let result: Result<Option<Vec<String>>, _> = get_json(&store, "guild-config:1").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_snapshot_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");

    {
        let store = MemoryStore::open(&path).await.unwrap();
        store
            .put("roles:1:any", "100".to_string(), PutOptions::default())
            .await
            .unwrap();
        store
            .put(
                "user-roles:1:2",
                "[]".to_string(),
                PutOptions::with_ttl(Duration::from_secs(300)),
            )
            .await
            .unwrap();
    }

    let reopened = MemoryStore::open(&path).await.unwrap();
    assert_eq!(reopened.get("roles:1:any").await.unwrap(), Some("100".to_string()));
    // Expiring records are not persisted
    assert_eq!(reopened.get("user-roles:1:2").await.unwrap(), None);
}
