//! Binary encoding for object-valued cache entries.
//!
//! Objects are stored as MessagePack with named fields, so adding or
//! reordering struct fields does not corrupt entries already in the store.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{CacheError, CacheResult};

/// Serializes a value into the blob stored in Redis.
pub fn encode<T>(value: &T) -> CacheResult<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Deserializes a blob read from `key`.
pub fn decode<T>(key: &str, bytes: &[u8]) -> CacheResult<T>
where
    T: DeserializeOwned,
{
    rmp_serde::from_slice(bytes).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Encodes every item of an iterator, stopping at the first failure.
pub(crate) fn encode_all<'a, T, I>(values: I) -> CacheResult<Vec<Vec<u8>>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    values.into_iter().map(|value| encode(value)).collect()
}
