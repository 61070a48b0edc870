//! Redis cache client: pool ownership, key prefixing and key lifecycle commands.

use std::time::Duration;

use deadpool_redis::{Connection, Pool, Runtime};
use redis::AsyncCommands;
use tracing::{debug, error, info, instrument, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};

/// Redis cache client backed by a connection pool.
///
/// Every operation borrows one connection from the pool for the duration of
/// the call. Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
    key_prefix: Option<String>,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("key_prefix", &self.key_prefix)
            .field("pool", &self.pool_status())
            .finish()
    }
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

impl RedisCache {
    /// Builds the pool without opening a connection.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::CreatePool` if the URL or pool settings are invalid.
    pub fn new(config: &CacheConfig) -> CacheResult<Self> {
        info!(url = %mask_redis_url(&config.redis_url), max_size = config.pool_max_size, "Creating Redis pool");

        let pool = config
            .pool_settings()
            .create_pool(Some(Runtime::Tokio1))
            .inspect_err(|e| error!(error = %e, "Failed to create Redis pool"))?;

        Ok(Self::from_pool(pool, config.key_prefix.clone()))
    }

    /// Builds the pool and verifies the store answers `PING`.
    pub async fn connect(config: &CacheConfig) -> CacheResult<Self> {
        let cache = Self::new(config)?;
        cache.ping().await?;
        info!("Successfully connected to Redis");
        Ok(cache)
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: Pool, key_prefix: Option<String>) -> Self {
        Self { pool, key_prefix }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Current pool occupancy.
    pub fn pool_status(&self) -> PoolStatus {
        let status = self.pool.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Borrows a connection for raw commands. It returns to the pool on drop.
    ///
    /// Keys sent through a raw connection are not prefixed.
    pub async fn connection(&self) -> CacheResult<Connection> {
        self.pool.get().await.map_err(|e| {
            error!(error = %e, pool = ?self.pool_status(), "Failed to acquire Redis connection");
            CacheError::from(e)
        })
    }

    /// Key as sent to the store, with the configured prefix applied.
    pub fn key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Logs a failed command and converts it into the crate error.
    pub(crate) fn fail(operation: &str, key: &str, err: impl Into<CacheError>) -> CacheError {
        let err = err.into();
        error!(cache.operation = operation, cache.key = %key, error = %err, "Redis command failed");
        err
    }

    /// Validates `ttl` before anything is written under `key`.
    pub(crate) fn expiry(operation: &str, key: &str, ttl: Duration) -> CacheResult<Option<i64>> {
        ttl_secs(ttl).map_err(|e| Self::fail(operation, key, e))
    }

    /// Applies an expiry from [`expiry`](Self::expiry) to a freshly written key.
    pub(crate) async fn apply_ttl(
        conn: &mut Connection,
        operation: &str,
        key: &str,
        expiry: Option<i64>,
    ) -> CacheResult<()> {
        if let Some(secs) = expiry {
            conn.expire::<_, bool>(key, secs)
                .await
                .map_err(|e| Self::fail(operation, key, e))?;
        }
        Ok(())
    }

    /// Sets or clears the expiry of a key.
    ///
    /// A zero `ttl` removes any existing expiry (`PERSIST`). Returns whether the
    /// store changed the key: `false` when it does not exist, or when clearing
    /// an expiry the key never had.
    #[instrument(skip(self), fields(cache.operation = "EXPIRE"))]
    pub async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let mut conn = self.connection().await?;

        let changed: bool = match expiry {
            Some(secs) => conn.expire(&key, secs).await,
            None => conn.persist(&key).await,
        }
        .map_err(|e| Self::fail("EXPIRE", &key, e))?;

        debug!(cache.key = %key, cache.ttl_secs = ttl.as_secs(), changed, "Expiry updated");
        Ok(changed)
    }

    /// Gets the remaining time-to-live for a key.
    ///
    /// Returns `None` if the key doesn't exist or has no expiry.
    #[instrument(skip(self), fields(cache.operation = "TTL"))]
    pub async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let ttl: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e| Self::fail("TTL", &key, e))?;

        // -1 (no expiry) or -2 (doesn't exist)
        Ok((ttl > 0).then(|| Duration::from_secs(ttl as u64)))
    }

    /// Deletes every key matching a glob pattern.
    ///
    /// Uses SCAN in batches of 100, which is safe on a live server but may be
    /// slow with many keys. The configured prefix is applied to the pattern.
    #[instrument(skip(self), fields(cache.operation = "SCAN_DEL"))]
    pub async fn delete_matching(&self, pattern: &str) -> CacheResult<u64> {
        let pattern = self.key(pattern);
        let mut conn = self.connection().await?;
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| Self::fail("SCAN", &pattern, e))?;

            if !keys.is_empty() {
                let count: u64 = conn
                    .del(&keys)
                    .await
                    .map_err(|e| Self::fail("DEL", &pattern, e))?;
                deleted += count;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        debug!(cache.pattern = %pattern, cache.deleted = deleted, "Pattern delete complete");
        Ok(deleted)
    }

    /// Removes every key in every database of the server.
    ///
    /// Ignores the key prefix; use [`delete_matching`](Self::delete_matching)
    /// with `"*"` to clear only this cache's namespace.
    #[instrument(skip(self), fields(cache.operation = "FLUSHALL"))]
    pub async fn flush_all(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;

        let _: () = redis::cmd("FLUSHALL")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::fail("FLUSHALL", "*", e))?;

        warn!("Flushed all Redis data");
        Ok(())
    }

    /// Checks that the store answers `PING`.
    #[instrument(skip(self), fields(cache.operation = "PING"))]
    pub async fn ping(&self) -> CacheResult<bool> {
        let mut conn = self.connection().await?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::fail("PING", "", e))?;

        Ok(pong == "PONG")
    }
}

/// Longest expiry accepted, in seconds. The store converts expiries to
/// absolute milliseconds, so this leaves room for the current time.
pub(crate) const MAX_TTL_SECS: i64 = i64::MAX / 1000 / 2;

/// Whole seconds to send to the store, or `None` for no expiry.
///
/// Non-zero durations shorter than a second round up to one second, since an
/// expiry of zero would delete the key outright. Durations past
/// [`MAX_TTL_SECS`] are rejected rather than wrapped.
pub(crate) fn ttl_secs(ttl: Duration) -> CacheResult<Option<i64>> {
    if ttl.is_zero() {
        return Ok(None);
    }
    i64::try_from(ttl.as_secs().max(1))
        .ok()
        .filter(|secs| *secs <= MAX_TTL_SECS)
        .map(Some)
        .ok_or(CacheError::TtlOutOfRange(ttl))
}

/// Mask password in Redis URL for safe logging.
pub(crate) fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if colon_pos >= scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
        if at_pos > scheme_end {
            // redis://password@host form
            return format!("{}****@{}", &url[..scheme_end], &url[at_pos + 1..]);
        }
    }
    url.to_string()
}
