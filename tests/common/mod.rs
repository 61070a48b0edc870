use keystash::cache::{CacheConfig, RedisCache};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TestProfile {
    pub id: u64,
    pub email: String,
    pub roles: Vec<String>,
}

#[allow(dead_code)]
pub fn profile(id: u64) -> TestProfile {
    TestProfile {
        id,
        email: format!("user{}@example.com", id),
        roles: vec!["reader".to_string()],
    }
}

/// Cache namespaced under a fresh prefix so tests never see each other's keys.
pub async fn setup_cache() -> RedisCache {
    dotenvy::dotenv().ok();
    let config = CacheConfig::from_env().with_prefix(format!("keystash-test:{}", Uuid::new_v4()));

    RedisCache::connect(&config)
        .await
        .expect("Redis must be reachable at REDIS_URL for ignored tests")
}

/// Deletes every key under the test's prefix.
pub async fn teardown(cache: &RedisCache) {
    cache.delete_matching("*").await.unwrap();
}
