//! # Keystash Cache
//!
//! Typed Redis operations over a pooled connection.
//!
//! This crate provides:
//! - Connection pooling via `deadpool-redis`
//! - Text, list, set and hash operations with optional TTL
//! - Object-valued counterparts that store values as MessagePack blobs
//! - Cache configuration from environment variables
//! - Cache key composition helpers
//!
//! Every operation returns a [`CacheResult`]; failures are logged where they
//! happen and handed back to the caller.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use keystash_cache::{CacheConfig, RedisCache};
//!
//! # async fn run() -> keystash_cache::CacheResult<()> {
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::connect(&config).await?;
//!
//! cache.set_with_ttl("greeting", "hello", Duration::from_secs(60)).await?;
//! let value = cache.get("greeting").await?;
//! assert_eq!(value.as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod redis;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use self::redis::{PoolStatus, RedisCache};

/// Re-exported so callers can name the pool and connection types.
pub use deadpool_redis::{Connection, Pool};
