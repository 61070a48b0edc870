//! Text-to-text hashes.

use std::collections::HashMap;
use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, instrument};

use super::client::RedisCache;
use crate::error::CacheResult;

impl RedisCache {
    /// Replaces the hash at `key` with `entries`.
    ///
    /// An empty `entries` leaves the key deleted.
    #[instrument(skip(self, entries), fields(cache.operation = "HMSET", cache.len = entries.len()))]
    pub async fn set_map(
        &self,
        key: &str,
        entries: &HashMap<String, String>,
        ttl: Duration,
    ) -> CacheResult<()> {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if entries.is_empty() {
            debug!(cache.key = %key, "Cache map cleared");
            return Ok(());
        }

        let items: Vec<(&String, &String)> = entries.iter().collect();
        conn.hset_multiple::<_, _, _, ()>(&key, items.as_slice())
            .await
            .map_err(|e| Self::fail("HMSET", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.ttl_secs = ttl.as_secs(), "Cache map set");
        Ok(())
    }

    /// Reads every field. A missing key reads as an empty map.
    #[instrument(skip(self), fields(cache.operation = "HGETALL"))]
    pub async fn get_map(&self, key: &str) -> CacheResult<HashMap<String, String>> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let fields: HashMap<String, String> = conn
            .hgetall(&key)
            .await
            .map_err(|e| Self::fail("HGETALL", &key, e))?;

        debug!(cache.key = %key, cache.len = fields.len(), "Cache map get");
        Ok(fields)
    }

    /// Writes `entries` into the hash, overwriting existing ones and creating
    /// the hash if missing. The key's expiry is left untouched.
    #[instrument(skip(self, entries), fields(cache.operation = "HMSET", cache.len = entries.len()))]
    pub async fn append_map(&self, key: &str, entries: &[(&str, &str)]) -> CacheResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let key = self.key(key);
        let mut conn = self.connection().await?;

        conn.hset_multiple::<_, _, _, ()>(&key, entries)
            .await
            .map_err(|e| Self::fail("HMSET", &key, e))?;

        debug!(cache.key = %key, "Cache map append");
        Ok(())
    }

    /// Removes one field. Returns 1 if it existed, 0 otherwise.
    #[instrument(skip(self), fields(cache.operation = "HDEL"))]
    pub async fn remove_map_field(&self, key: &str, field: &str) -> CacheResult<u64> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let removed: u64 = conn
            .hdel(&key, field)
            .await
            .map_err(|e| Self::fail("HDEL", &key, e))?;

        debug!(cache.key = %key, cache.field = field, removed, "Cache map field removed");
        Ok(removed)
    }

    /// Checks whether the hash has `field`.
    #[instrument(skip(self), fields(cache.operation = "HEXISTS"))]
    pub async fn has_map_field(&self, key: &str, field: &str) -> CacheResult<bool> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        conn.hexists(&key, field)
            .await
            .map_err(|e| Self::fail("HEXISTS", &key, e))
    }
}
