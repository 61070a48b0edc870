mod common;

use std::time::Duration;

use common::{setup_cache, teardown};

// Integration tests require a running Redis instance
// Run with: cargo test -- --ignored

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_set_and_get() {
    let cache = setup_cache().await;

    cache.set("greeting", "hello").await.unwrap();

    assert_eq!(cache.get("greeting").await.unwrap().as_deref(), Some("hello"));
    assert!(cache.exists("greeting").await.unwrap());
    assert_eq!(cache.ttl("greeting").await.unwrap(), None);

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_get_missing_key_is_none() {
    let cache = setup_cache().await;

    assert_eq!(cache.get("nothing-here").await.unwrap(), None);
    assert!(!cache.exists("nothing-here").await.unwrap());
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_set_with_ttl_expires() {
    let cache = setup_cache().await;

    cache
        .set_with_ttl("short-lived", "v", Duration::from_secs(1))
        .await
        .unwrap();

    let ttl = cache.ttl("short-lived").await.unwrap();
    assert_eq!(ttl, Some(Duration::from_secs(1)));

    tokio::time::sleep(Duration::from_millis(2_100)).await;

    assert_eq!(cache.get("short-lived").await.unwrap(), None);
    assert!(!cache.exists("short-lived").await.unwrap());
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_zero_ttl_means_no_expiry() {
    let cache = setup_cache().await;

    cache
        .set_with_ttl("forever", "v", Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(cache.ttl("forever").await.unwrap(), None);
    assert!(cache.exists("forever").await.unwrap());

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_append_on_missing_key_behaves_like_set() {
    let cache = setup_cache().await;

    let len = cache.append("log", "abc").await.unwrap();
    assert_eq!(len, 3);
    assert_eq!(cache.get("log").await.unwrap().as_deref(), Some("abc"));

    let len = cache.append("log", "def").await.unwrap();
    assert_eq!(len, 6);
    assert_eq!(cache.get("log").await.unwrap().as_deref(), Some("abcdef"));

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_delete_missing_key_returns_zero() {
    let cache = setup_cache().await;

    assert_eq!(cache.delete("never-written").await.unwrap(), 0);

    cache.set("written", "v").await.unwrap();
    assert_eq!(cache.delete("written").await.unwrap(), 1);
    assert_eq!(cache.get("written").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_multi_set_get_and_delete() {
    let cache = setup_cache().await;

    cache
        .set_many(&[("a", "1"), ("b", "2"), ("c", "3")])
        .await
        .unwrap();

    let values = cache.get_many(&["a", "missing", "c"]).await.unwrap();
    assert_eq!(
        values,
        vec![Some("1".to_string()), None, Some("3".to_string())]
    );

    // A single key still goes through MGET.
    let single = cache.get_many(&["b"]).await.unwrap();
    assert_eq!(single, vec![Some("2".to_string())]);

    assert!(cache.get_many(&[]).await.unwrap().is_empty());
    assert_eq!(cache.delete_many(&["a", "b", "missing"]).await.unwrap(), 2);
    assert_eq!(cache.delete_many(&[]).await.unwrap(), 0);

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_expire_and_persist() {
    let cache = setup_cache().await;

    cache.set("session", "token").await.unwrap();

    assert!(cache.expire("session", Duration::from_secs(120)).await.unwrap());
    let ttl = cache.ttl("session").await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(120) && ttl >= Duration::from_secs(118));

    assert!(cache.expire("session", Duration::ZERO).await.unwrap());
    assert_eq!(cache.ttl("session").await.unwrap(), None);

    assert!(!cache.expire("no-such-key", Duration::from_secs(5)).await.unwrap());

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_delete_matching_stays_inside_prefix() {
    let cache = setup_cache().await;
    let neighbour = setup_cache().await;

    cache.set("report:1", "x").await.unwrap();
    cache.set("report:2", "y").await.unwrap();
    cache.set("other", "z").await.unwrap();
    neighbour.set("report:1", "kept").await.unwrap();

    assert_eq!(cache.delete_matching("report:*").await.unwrap(), 2);
    assert!(cache.exists("other").await.unwrap());
    assert_eq!(
        neighbour.get("report:1").await.unwrap().as_deref(),
        Some("kept")
    );

    teardown(&cache).await;
    teardown(&neighbour).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_ping_and_pool_accessor() {
    let cache = setup_cache().await;

    assert!(cache.ping().await.unwrap());

    let mut conn = cache.connection().await.unwrap();
    let pong: String = redis::cmd("PING").query_async(&mut conn).await.unwrap();
    assert_eq!(pong, "PONG");
    drop(conn);

    let status = cache.pool_status();
    assert!(status.size >= 1);
    assert_eq!(status.available, status.size);
    assert_eq!(cache.pool().status().max_size, status.max_size);
}

#[tokio::test]
#[ignore = "flushes every key on the Redis server"]
async fn test_flush_all() {
    let cache = setup_cache().await;

    cache.set("doomed", "v").await.unwrap();
    cache.flush_all().await.unwrap();

    assert!(!cache.exists("doomed").await.unwrap());
}
