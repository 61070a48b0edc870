//! Cache key helpers.
//!
//! Keys are opaque to the facade; these helpers only give callers a
//! consistent way to compose them.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::codec;
use crate::error::CacheResult;

/// Separator between key segments.
pub const SEPARATOR: char = ':';

/// Joins key segments with `:`, skipping empty ones.
///
/// ```
/// use keystash_cache::keys::build_key;
///
/// assert_eq!(build_key(&["user", "42", "", "roles"]), "user:42:roles");
/// ```
pub fn build_key(parts: &[&str]) -> String {
    let mut key = String::new();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if !key.is_empty() {
            key.push(SEPARATOR);
        }
        key.push_str(part);
    }
    key
}

/// Generates a short, stable digest of arbitrary parameters.
///
/// The value is serialized with the object codec and hashed with SHA-256, so
/// the result is identical across processes and Rust versions. Returns the
/// first 16 hex characters, or `CacheError::Encode` if the value cannot be
/// serialized.
pub fn hash_parts<T: Serialize + ?Sized>(value: &T) -> CacheResult<String> {
    let bytes = codec::encode(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(&digest[..8]))
}
