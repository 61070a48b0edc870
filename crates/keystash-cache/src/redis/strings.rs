//! Text values.

use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, instrument, warn};

use super::client::RedisCache;
use crate::error::CacheResult;

impl RedisCache {
    /// Stores a text value with no expiry.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.set_with_ttl(key, value, Duration::ZERO).await
    }

    /// Stores a text value that expires after `ttl`. A zero `ttl` means no expiry.
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let key = self.key(key);
        let expiry = Self::expiry("SET", &key, ttl)?;
        let mut conn = self.connection().await?;

        let written = match expiry {
            Some(secs) => conn.set_ex::<_, _, ()>(&key, value, secs.unsigned_abs()).await,
            None => conn.set::<_, _, ()>(&key, value).await,
        };
        written.map_err(|e| Self::fail("SET", &key, e))?;

        debug!(cache.key = %key, cache.ttl_secs = ttl.as_secs(), cache.bytes = value.len(), "Cache set");
        Ok(())
    }

    /// Reads a text value.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| Self::fail("GET", &key, e))?;

        match &value {
            Some(_) => debug!(cache.key = %key, "Cache hit"),
            None => debug!(cache.key = %key, "Cache miss"),
        }
        Ok(value)
    }

    /// Appends to a text value, creating it if missing. Returns the new length.
    #[instrument(skip(self, value), fields(cache.operation = "APPEND"))]
    pub async fn append(&self, key: &str, value: &str) -> CacheResult<usize> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let len: usize = conn
            .append(&key, value)
            .await
            .map_err(|e| Self::fail("APPEND", &key, e))?;

        debug!(cache.key = %key, cache.len = len, "Cache append");
        Ok(len)
    }

    /// Checks whether a key exists, whatever its value type.
    #[instrument(skip(self), fields(cache.operation = "EXISTS"))]
    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        conn.exists(&key)
            .await
            .map_err(|e| Self::fail("EXISTS", &key, e))
    }

    /// Deletes a key. Returns the number of keys removed (0 or 1).
    ///
    /// Deleting a missing key is not an error.
    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn delete(&self, key: &str) -> CacheResult<u64> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let count: u64 = conn
            .del(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if count == 0 {
            warn!(cache.key = %key, "Delete of missing key");
        } else {
            debug!(cache.key = %key, "Cache invalidated");
        }
        Ok(count)
    }

    /// Deletes several keys in one command. Returns how many existed.
    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn delete_many(&self, keys: &[&str]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.connection().await?;

        let count: u64 = conn
            .del(&keys)
            .await
            .map_err(|e| Self::fail("DEL", &keys.join(" "), e))?;

        debug!(cache.keys = keys.len(), cache.deleted = count, "Cache invalidated");
        Ok(count)
    }

    /// Stores several text values in one command, none with an expiry.
    #[instrument(skip(self, pairs), fields(cache.operation = "MSET", cache.keys = pairs.len()))]
    pub async fn set_many(&self, pairs: &[(&str, &str)]) -> CacheResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }

        let pairs: Vec<(String, &str)> = pairs.iter().map(|(k, v)| (self.key(k), *v)).collect();
        let mut conn = self.connection().await?;

        conn.mset::<_, _, ()>(pairs.as_slice())
            .await
            .map_err(|e| Self::fail("MSET", &pairs[0].0, e))?;

        debug!(cache.keys = pairs.len(), "Cache multi-set");
        Ok(())
    }

    /// Reads several text values. The result lines up with `keys`; missing
    /// keys yield `None`.
    #[instrument(skip(self), fields(cache.operation = "MGET"))]
    pub async fn get_many(&self, keys: &[&str]) -> CacheResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.connection().await?;

        // Explicit MGET: the typed helper sends GET for a single key, which
        // does not decode into a Vec.
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::fail("MGET", &keys.join(" "), e))?;

        let hits = values.iter().filter(|v| v.is_some()).count();
        debug!(cache.keys = keys.len(), cache.hits = hits, "Cache multi-get");
        Ok(values)
    }
}
