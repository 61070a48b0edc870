//! Error type shared by every cache operation.

use std::time::Duration;

use deadpool_redis::{CreatePoolError, PoolError};

/// Error type for cache operations.
///
/// Every failing operation logs the error once at the facade boundary and then
/// hands it back to the caller; nothing is masked as a default value.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Redis pool configuration error: {0}")]
    CreatePool(#[from] CreatePoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Failed to deserialize value stored at '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: rmp_serde::decode::Error,
    },

    #[error("TTL of {0:?} exceeds the maximum the store accepts")]
    TtlOutOfRange(Duration),
}

impl CacheError {
    /// True when the failure happened before a connection was obtained.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Pool(_) | Self::CreatePool(_) => true,
            Self::Redis(e) => e.is_io_error() || e.is_connection_refusal(),
            _ => false,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type CacheResult<T> = Result<T, CacheError>;
