//! Ordered sequences of text.

use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, instrument};

use super::client::RedisCache;
use crate::error::CacheResult;

impl RedisCache {
    /// Replaces the list at `key` with `values`. Returns the new length.
    ///
    /// An empty `values` leaves the key deleted. The delete and the push are
    /// separate commands, so a concurrent reader may briefly see no list.
    #[instrument(skip(self, values), fields(cache.operation = "RPUSH", cache.len = values.len()))]
    pub async fn set_list(&self, key: &str, values: &[String], ttl: Duration) -> CacheResult<usize> {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if values.is_empty() {
            debug!(cache.key = %key, "Cache list cleared");
            return Ok(0);
        }

        let len: usize = conn
            .rpush(&key, values)
            .await
            .map_err(|e| Self::fail("RPUSH", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.len = len, cache.ttl_secs = ttl.as_secs(), "Cache list set");
        Ok(len)
    }

    /// Reads the whole list. A missing key reads as an empty list.
    #[instrument(skip(self), fields(cache.operation = "LRANGE"))]
    pub async fn get_list(&self, key: &str) -> CacheResult<Vec<String>> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let values: Vec<String> = conn
            .lrange(&key, 0, -1)
            .await
            .map_err(|e| Self::fail("LRANGE", &key, e))?;

        debug!(cache.key = %key, cache.len = values.len(), "Cache list get");
        Ok(values)
    }

    /// Pushes `values` onto the tail of the list, creating it if missing.
    /// Returns the new length.
    #[instrument(skip(self, values), fields(cache.operation = "RPUSH", cache.len = values.len()))]
    pub async fn append_list(&self, key: &str, values: &[String]) -> CacheResult<usize> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let len: usize = if values.is_empty() {
            conn.llen(&key)
                .await
                .map_err(|e| Self::fail("LLEN", &key, e))?
        } else {
            conn.rpush(&key, values)
                .await
                .map_err(|e| Self::fail("RPUSH", &key, e))?
        };

        debug!(cache.key = %key, cache.len = len, "Cache list append");
        Ok(len)
    }
}
