//! Redis cache configuration.
//!
//! This module provides configuration for the Redis connection pool and key
//! namespacing, loaded from environment variables.

use std::env;
use std::time::Duration;

use deadpool_redis::{Config as PoolSettings, PoolConfig};

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_POOL_MAX_SIZE: usize = 16;
const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CREATE_TIMEOUT_MS: u64 = 2_000;

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `REDIS_POOL_MAX_SIZE`: Maximum pooled connections (default: `16`)
/// - `REDIS_POOL_WAIT_TIMEOUT_MS`: How long a caller waits for a free connection (default: `5000`)
/// - `REDIS_POOL_CREATE_TIMEOUT_MS`: How long opening a new connection may take (default: `2000`)
/// - `CACHE_PREFIX`: Prefix for all cache keys (default: none)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis connection URL.
    pub redis_url: String,

    /// Maximum number of connections held by the pool.
    pub pool_max_size: usize,

    /// Maximum time to wait for a pooled connection.
    pub wait_timeout: Duration,

    /// Maximum time to establish a new connection.
    pub create_timeout: Duration,

    /// Optional prefix for all cache keys to avoid collisions.
    pub key_prefix: Option<String>,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into()),
            pool_max_size: parse_var("REDIS_POOL_MAX_SIZE").unwrap_or(DEFAULT_POOL_MAX_SIZE),
            wait_timeout: Duration::from_millis(
                parse_var("REDIS_POOL_WAIT_TIMEOUT_MS").unwrap_or(DEFAULT_WAIT_TIMEOUT_MS),
            ),
            create_timeout: Duration::from_millis(
                parse_var("REDIS_POOL_CREATE_TIMEOUT_MS").unwrap_or(DEFAULT_CREATE_TIMEOUT_MS),
            ),
            key_prefix: env::var("CACHE_PREFIX")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }

    /// Use a different Redis URL.
    pub fn with_url(mut self, redis_url: impl Into<String>) -> Self {
        self.redis_url = redis_url.into();
        self
    }

    /// Namespace every key under `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Build a prefixed cache key.
    ///
    /// # Example
    ///
    /// ```
    /// use keystash_cache::CacheConfig;
    ///
    /// let config = CacheConfig::default().with_prefix("app");
    /// assert_eq!(config.prefixed_key("user:1"), "app:user:1");
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Translate into `deadpool-redis` settings.
    pub(crate) fn pool_settings(&self) -> PoolSettings {
        let mut pool = PoolConfig::new(self.pool_max_size);
        pool.timeouts.wait = Some(self.wait_timeout);
        pool.timeouts.create = Some(self.create_timeout);

        let mut settings = PoolSettings::from_url(self.redis_url.clone());
        settings.pool = Some(pool);
        settings
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            create_timeout: Duration::from_millis(DEFAULT_CREATE_TIMEOUT_MS),
            key_prefix: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
