//! Object values, stored as codec blobs.
//!
//! Object lists and sets hold one blob per element in a native Redis list or
//! set, so appends are single RPUSH / SADD commands and concurrent appenders
//! never overwrite each other.

use std::collections::HashMap;
use std::time::Duration;

use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use super::client::RedisCache;
use crate::codec;
use crate::error::CacheResult;

impl RedisCache {
    /// Serializes `value` and stores it. A zero `ttl` means no expiry.
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set_object<T>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.key(key);
        let expiry = Self::expiry("SET", &key, ttl)?;
        let blob = codec::encode(value).map_err(|e| Self::fail("SET", &key, e))?;
        let mut conn = self.connection().await?;

        let written = match expiry {
            Some(secs) => conn.set_ex::<_, _, ()>(&key, &blob, secs.unsigned_abs()).await,
            None => conn.set::<_, _, ()>(&key, &blob).await,
        };
        written.map_err(|e| Self::fail("SET", &key, e))?;

        debug!(cache.key = %key, cache.bytes = blob.len(), cache.ttl_secs = ttl.as_secs(), "Cache object set");
        Ok(())
    }

    /// Reads and deserializes an object. `None` if the key is missing.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get_object<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let blob: Option<Vec<u8>> = conn
            .get(&key)
            .await
            .map_err(|e| Self::fail("GET", &key, e))?;

        let Some(blob) = blob else {
            debug!(cache.key = %key, "Cache miss");
            return Ok(None);
        };

        debug!(cache.key = %key, cache.bytes = blob.len(), "Cache hit");
        codec::decode(&key, &blob)
            .map(Some)
            .map_err(|e| Self::fail("GET", &key, e))
    }

    /// Checks whether an object key exists.
    pub async fn exists_object(&self, key: &str) -> CacheResult<bool> {
        self.exists(key).await
    }

    /// Deletes an object key. Returns 0 if it did not exist.
    pub async fn delete_object(&self, key: &str) -> CacheResult<u64> {
        self.delete(key).await
    }

    /// Replaces the object list at `key`. Returns the new length.
    ///
    /// An empty `values` leaves the key deleted.
    #[instrument(skip(self, values), fields(cache.operation = "RPUSH", cache.len = values.len()))]
    pub async fn set_object_list<T>(
        &self,
        key: &str,
        values: &[T],
        ttl: Duration,
    ) -> CacheResult<usize>
    where
        T: Serialize,
    {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let blobs = codec::encode_all(values).map_err(|e| Self::fail("RPUSH", &key, e))?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if blobs.is_empty() {
            debug!(cache.key = %key, "Cache object list cleared");
            return Ok(0);
        }

        let len: usize = conn
            .rpush(&key, blobs)
            .await
            .map_err(|e| Self::fail("RPUSH", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.len = len, cache.ttl_secs = ttl.as_secs(), "Cache object list set");
        Ok(len)
    }

    /// Reads and deserializes every element. A missing key reads as empty.
    #[instrument(skip(self), fields(cache.operation = "LRANGE"))]
    pub async fn get_object_list<T>(&self, key: &str) -> CacheResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let blobs: Vec<Vec<u8>> = conn
            .lrange(&key, 0, -1)
            .await
            .map_err(|e| Self::fail("LRANGE", &key, e))?;

        debug!(cache.key = %key, cache.len = blobs.len(), "Cache object list get");
        decode_each(&key, &blobs)
    }

    /// Pushes serialized `values` onto the tail of the list in one atomic
    /// command. Returns the new length.
    #[instrument(skip(self, values), fields(cache.operation = "RPUSH", cache.len = values.len()))]
    pub async fn append_object_list<T>(&self, key: &str, values: &[T]) -> CacheResult<usize>
    where
        T: Serialize,
    {
        let key = self.key(key);
        let blobs = codec::encode_all(values).map_err(|e| Self::fail("RPUSH", &key, e))?;
        let mut conn = self.connection().await?;

        let len: usize = if blobs.is_empty() {
            conn.llen(&key)
                .await
                .map_err(|e| Self::fail("LLEN", &key, e))?
        } else {
            conn.rpush(&key, blobs)
                .await
                .map_err(|e| Self::fail("RPUSH", &key, e))?
        };

        debug!(cache.key = %key, cache.len = len, "Cache object list append");
        Ok(len)
    }

    /// Replaces the object set at `key`. Returns the number of distinct
    /// members stored.
    ///
    /// Membership is decided on the serialized bytes, so values that encode
    /// identically collapse into one member.
    #[instrument(skip(self, values), fields(cache.operation = "SADD", cache.len = values.len()))]
    pub async fn set_object_set<T>(&self, key: &str, values: &[T], ttl: Duration) -> CacheResult<u64>
    where
        T: Serialize,
    {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let blobs = codec::encode_all(values).map_err(|e| Self::fail("SADD", &key, e))?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if blobs.is_empty() {
            debug!(cache.key = %key, "Cache object set cleared");
            return Ok(0);
        }

        let added: u64 = conn
            .sadd(&key, blobs)
            .await
            .map_err(|e| Self::fail("SADD", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.added = added, cache.ttl_secs = ttl.as_secs(), "Cache object set stored");
        Ok(added)
    }

    /// Reads and deserializes every member, in no particular order.
    #[instrument(skip(self), fields(cache.operation = "SMEMBERS"))]
    pub async fn get_object_set<T>(&self, key: &str) -> CacheResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let blobs: Vec<Vec<u8>> = conn
            .smembers(&key)
            .await
            .map_err(|e| Self::fail("SMEMBERS", &key, e))?;

        debug!(cache.key = %key, cache.len = blobs.len(), "Cache object set get");
        decode_each(&key, &blobs)
    }

    /// Adds serialized `values` to the set in one atomic command. Returns how
    /// many were not already present.
    #[instrument(skip(self, values), fields(cache.operation = "SADD", cache.len = values.len()))]
    pub async fn append_object_set<T>(&self, key: &str, values: &[T]) -> CacheResult<u64>
    where
        T: Serialize,
    {
        if values.is_empty() {
            return Ok(0);
        }

        let key = self.key(key);
        let blobs = codec::encode_all(values).map_err(|e| Self::fail("SADD", &key, e))?;
        let mut conn = self.connection().await?;

        let added: u64 = conn
            .sadd(&key, blobs)
            .await
            .map_err(|e| Self::fail("SADD", &key, e))?;

        debug!(cache.key = %key, cache.added = added, "Cache object set append");
        Ok(added)
    }

    /// Replaces the hash at `key` with serialized field values.
    ///
    /// An empty `entries` leaves the key deleted.
    #[instrument(skip(self, entries), fields(cache.operation = "HMSET", cache.len = entries.len()))]
    pub async fn set_object_map<T>(
        &self,
        key: &str,
        entries: &HashMap<String, T>,
        ttl: Duration,
    ) -> CacheResult<()>
    where
        T: Serialize,
    {
        let key = self.key(key);
        let expiry = Self::expiry("EXPIRE", &key, ttl)?;
        let items = encode_fields(entries.iter().map(|(f, v)| (f.as_str(), v)))
            .map_err(|e| Self::fail("HMSET", &key, e))?;
        let mut conn = self.connection().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| Self::fail("DEL", &key, e))?;

        if items.is_empty() {
            debug!(cache.key = %key, "Cache object map cleared");
            return Ok(());
        }

        conn.hset_multiple::<_, _, _, ()>(&key, items.as_slice())
            .await
            .map_err(|e| Self::fail("HMSET", &key, e))?;
        Self::apply_ttl(&mut conn, "EXPIRE", &key, expiry).await?;

        debug!(cache.key = %key, cache.ttl_secs = ttl.as_secs(), "Cache object map set");
        Ok(())
    }

    /// Reads and deserializes every field. A missing key reads as empty.
    #[instrument(skip(self), fields(cache.operation = "HGETALL"))]
    pub async fn get_object_map<T>(&self, key: &str) -> CacheResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
    {
        let key = self.key(key);
        let mut conn = self.connection().await?;

        let blobs: HashMap<String, Vec<u8>> = conn
            .hgetall(&key)
            .await
            .map_err(|e| Self::fail("HGETALL", &key, e))?;

        debug!(cache.key = %key, cache.len = blobs.len(), "Cache object map get");
        blobs
            .into_iter()
            .map(|(field, blob)| codec::decode(&key, &blob).map(|value| (field, value)))
            .collect::<CacheResult<_>>()
            .map_err(|e| Self::fail("HGETALL", &key, e))
    }

    /// Writes serialized field values into the hash, creating it if missing.
    #[instrument(skip(self, entries), fields(cache.operation = "HMSET", cache.len = entries.len()))]
    pub async fn append_object_map<T>(&self, key: &str, entries: &[(&str, T)]) -> CacheResult<()>
    where
        T: Serialize,
    {
        if entries.is_empty() {
            return Ok(());
        }

        let key = self.key(key);
        let items = encode_fields(entries.iter().map(|(f, v)| (*f, v)))
            .map_err(|e| Self::fail("HMSET", &key, e))?;
        let mut conn = self.connection().await?;

        conn.hset_multiple::<_, _, _, ()>(&key, items.as_slice())
            .await
            .map_err(|e| Self::fail("HMSET", &key, e))?;

        debug!(cache.key = %key, "Cache object map append");
        Ok(())
    }

    /// Removes one field from an object hash. Returns 1 if it existed.
    pub async fn remove_object_map_field(&self, key: &str, field: &str) -> CacheResult<u64> {
        self.remove_map_field(key, field).await
    }

    /// Checks whether an object hash has `field`.
    pub async fn has_object_map_field(&self, key: &str, field: &str) -> CacheResult<bool> {
        self.has_map_field(key, field).await
    }
}

fn decode_each<T: DeserializeOwned>(key: &str, blobs: &[Vec<u8>]) -> CacheResult<Vec<T>> {
    blobs
        .iter()
        .map(|blob| codec::decode(key, blob))
        .collect::<CacheResult<Vec<T>>>()
        .map_err(|e| RedisCache::fail("DECODE", key, e))
}

fn encode_fields<'a, T, I>(entries: I) -> CacheResult<Vec<(&'a str, Vec<u8>)>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    entries
        .into_iter()
        .map(|(field, value)| codec::encode(value).map(|blob| (field, blob)))
        .collect()
}
