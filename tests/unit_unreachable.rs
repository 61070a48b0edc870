use std::time::Duration;

use keystash::cache::{CacheConfig, CacheError, RedisCache};

/// Nothing listens on port 1, so every connection attempt is refused.
fn unreachable_cache() -> RedisCache {
    let config = CacheConfig {
        create_timeout: Duration::from_millis(500),
        wait_timeout: Duration::from_millis(500),
        ..CacheConfig::default().with_url("redis://127.0.0.1:1")
    };
    RedisCache::new(&config).unwrap()
}

#[tokio::test]
async fn test_read_failure_is_returned_not_masked() {
    let cache = unreachable_cache();

    let err = cache.get("any").await.unwrap_err();
    assert!(matches!(err, CacheError::Pool(_)));
    assert!(err.is_connection_failure());
}

#[tokio::test]
async fn test_write_failure_is_returned_not_masked() {
    let cache = unreachable_cache();

    let err = cache
        .set_with_ttl("any", "v", Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::Pool(_)));

    let err = cache.exists("any").await.unwrap_err();
    assert!(matches!(err, CacheError::Pool(_)));
}

#[tokio::test]
async fn test_connect_fails_fast() {
    let config = CacheConfig {
        create_timeout: Duration::from_millis(500),
        ..CacheConfig::default().with_url("redis://127.0.0.1:1")
    };

    let err = RedisCache::connect(&config).await.unwrap_err();
    assert!(err.is_connection_failure());
}

#[tokio::test]
async fn test_empty_batches_skip_the_store() {
    let cache = unreachable_cache();

    // None of these need a connection, so they succeed even with no server.
    assert_eq!(cache.delete_many(&[]).await.unwrap(), 0);
    assert!(cache.get_many(&[]).await.unwrap().is_empty());
    cache.set_many(&[]).await.unwrap();
    assert_eq!(cache.append_set("k", &[]).await.unwrap(), 0);
    cache.append_map("k", &[]).await.unwrap();
}

#[tokio::test]
async fn test_oversized_ttl_rejected_before_any_write() {
    let cache = unreachable_cache();
    let values = vec!["a".to_string()];

    // The TTL is checked first, so no connection is ever attempted.
    let err = cache
        .set_list("queue", &values, Duration::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::TtlOutOfRange(_)));
    assert!(!err.is_connection_failure());

    let err = cache.expire("queue", Duration::MAX).await.unwrap_err();
    assert!(matches!(err, CacheError::TtlOutOfRange(_)));

    let err = cache
        .set_with_ttl("queue", "v", Duration::from_secs(u64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::TtlOutOfRange(_)));

    let err = cache
        .set_object_list("queue", &[1u32, 2], Duration::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::TtlOutOfRange(_)));
}
