//! Sets of text.

use std::collections::HashSet;
use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, instrument};

use super::client::RedisCache;
use crate::error::CacheResult;

impl RedisCache {
    /// Replaces the set at `key` with `members`. Returns the number of
    /// distinct members stored.
    ///
    /// An empty `members` leaves the key deleted.
    #[instrument(skip(self, members), fields(cache.operation = "SADD", cache.len = members.len()))]
    pub async fn set_set(
        &self,
        key: &str,
        members: &HashSet<String>,
        ttl: Duration,
    ) -> CacheResult<u64> {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if members.is_empty() {
            debug!(cache.key = %key, "Cache set cleared");
            return Ok(0);
        }

        let members: Vec<&String> = members.iter().collect();
        let added: u64 = conn
            .sadd(&key, members)
            .await
            .map_err(|e| Self::fail("SADD", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.added = added, cache.ttl_secs = ttl.as_secs(), "Cache set stored");
        Ok(added)
    }

    /// Reads all members. A missing key reads as an empty set.
    #[instrument(skip(self), fields(cache.operation = "SMEMBERS"))]
    pub async fn get_set(&self, key: &str) -> CacheResult<HashSet<String>> {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let members: HashSet<String> = conn
            .smembers(&key)
            .await
            .map_err(|e| Self::fail("SMEMBERS", &key, e))?;

        debug!(cache.key = %key, cache.len = members.len(), "Cache set get");
        Ok(members)
    }

    /// Adds `members` to the set, creating it if missing. Returns how many
    /// were not already present.
    #[instrument(skip(self, members), fields(cache.operation = "SADD", cache.len = members.len()))]
    pub async fn append_set(&self, key: &str, members: &[&str]) -> CacheResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }

        let key = self.key(key);
        let mut conn = self.connection().await?;

        let added: u64 = conn
            .sadd(&key, members)
            .await
            .map_err(|e| Self::fail("SADD", &key, e))?;

        debug!(cache.key = %key, cache.added = added, "Cache set append");
        Ok(added)
    }
}
