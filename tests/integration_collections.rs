mod common;

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use common::{setup_cache, teardown};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_list_set_get_append() {
    let cache = setup_cache().await;

    let len = cache
        .set_list("queue", &strings(&["a", "b"]), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(len, 2);

    let len = cache.append_list("queue", &strings(&["c"])).await.unwrap();
    assert_eq!(len, 3);
    assert_eq!(cache.get_list("queue").await.unwrap(), strings(&["a", "b", "c"]));

    // Replacing discards the previous contents.
    cache
        .set_list("queue", &strings(&["z"]), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(cache.get_list("queue").await.unwrap(), strings(&["z"]));

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_list_edge_cases() {
    let cache = setup_cache().await;

    assert!(cache.get_list("missing").await.unwrap().is_empty());

    cache
        .set_list("queue", &strings(&["a"]), Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(cache.append_list("queue", &[]).await.unwrap(), 1);

    assert_eq!(cache.set_list("queue", &[], Duration::ZERO).await.unwrap(), 0);
    assert!(!cache.exists("queue").await.unwrap());

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_list_ttl_applied() {
    let cache = setup_cache().await;

    cache
        .set_list("recent", &strings(&["a"]), Duration::from_secs(300))
        .await
        .unwrap();

    let ttl = cache.ttl("recent").await.unwrap().unwrap();
    assert!(ttl > Duration::from_secs(290));

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_set_of_text() {
    let cache = setup_cache().await;

    let members: HashSet<String> = strings(&["red", "green"]).into_iter().collect();
    assert_eq!(
        cache.set_set("colours", &members, Duration::ZERO).await.unwrap(),
        2
    );

    assert_eq!(
        cache.append_set("colours", &["green", "blue"]).await.unwrap(),
        1
    );

    let stored = cache.get_set("colours").await.unwrap();
    let expected: HashSet<String> = strings(&["red", "green", "blue"]).into_iter().collect();
    assert_eq!(stored, expected);

    assert!(cache.get_set("missing").await.unwrap().is_empty());
    assert_eq!(cache.append_set("colours", &[]).await.unwrap(), 0);

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_map_of_text() {
    let cache = setup_cache().await;

    let fields: HashMap<String, String> = HashMap::from([
        ("name".to_string(), "ada".to_string()),
        ("lang".to_string(), "en".to_string()),
    ]);
    cache
        .set_map("user:1", &fields, Duration::from_secs(60))
        .await
        .unwrap();

    cache
        .append_map("user:1", &[("lang", "fr"), ("tz", "UTC")])
        .await
        .unwrap();

    let stored = cache.get_map("user:1").await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored["name"], "ada");
    assert_eq!(stored["lang"], "fr");
    assert_eq!(stored["tz"], "UTC");

    // Appending fields keeps the expiry set on the hash.
    assert!(cache.ttl("user:1").await.unwrap().is_some());

    assert!(cache.has_map_field("user:1", "tz").await.unwrap());
    assert_eq!(cache.remove_map_field("user:1", "tz").await.unwrap(), 1);
    assert_eq!(cache.remove_map_field("user:1", "tz").await.unwrap(), 0);
    assert!(!cache.has_map_field("user:1", "tz").await.unwrap());

    assert!(cache.get_map("missing").await.unwrap().is_empty());

    teardown(&cache).await;
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_wrong_type_is_reported() {
    let cache = setup_cache().await;

    cache.set("plain", "text").await.unwrap();
    let err = cache.get_list("plain").await.unwrap_err();
    assert!(matches!(err, keystash::cache::CacheError::Redis(_)));

    teardown(&cache).await;
}

#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_empty_append_failure_logs_llen() {
    let cache = setup_cache().await;
    cache.set("plain", "text").await.unwrap();

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    assert!(cache.append_list("plain", &[]).await.is_err());
    assert!(cache.append_object_list::<u32>("plain", &[]).await.is_err());
    drop(guard);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let failures: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("Redis command failed"))
        .collect();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|line| line.contains("cache.operation=\"LLEN\"")));

    teardown(&cache).await;
}
