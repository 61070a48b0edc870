//! # Keystash
//!
//! A typed façade over Redis: text, list, set, hash and object values with
//! optional expiry, served from a connection pool.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── keystash-cache/          # RedisCache, config, pool, codec, key helpers
//! ├── keystash-observability/  # tracing-subscriber setup
//! └── keystash-cli/            # keystash-cli binary
//! ```
//!
//! ## Quick Start
//!
//! ### Environment Variables
//!
//! ```bash
//! REDIS_URL=redis://127.0.0.1:6379
//! REDIS_POOL_MAX_SIZE=16
//! CACHE_PREFIX=myapp
//! LOG_LEVEL=info
//! LOG_FORMAT=json
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use std::time::Duration;
//! use keystash::cache::{CacheConfig, RedisCache};
//!
//! # async fn run() -> keystash::cache::CacheResult<()> {
//! keystash::observability::init_logging();
//!
//! let cache = RedisCache::connect(&CacheConfig::from_env()).await?;
//! cache.set_list("recent", &["a".to_string(), "b".to_string()], Duration::from_secs(300)).await?;
//! cache.append_list("recent", &["c".to_string()]).await?;
//! assert_eq!(cache.get_list("recent").await?.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ### CLI
//!
//! ```bash
//! cargo run --bin keystash-cli -- set greeting hello --ttl 60
//! cargo run --bin keystash-cli -- get greeting
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns `Result<_, CacheError>`. Failures are logged at the
//! point they occur and returned; nothing is swallowed into a default value.

// Re-export workspace crates for convenience
pub use keystash_cache as cache;
pub use keystash_observability as observability;
