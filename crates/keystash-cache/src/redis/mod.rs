//! Redis cache facade.
//!
//! [`RedisCache`] is defined in [`client`]; the typed operations are split by
//! value shape into the sibling modules, each adding an `impl RedisCache` block.

pub mod client;
mod lists;
mod maps;
mod objects;
mod sets;
mod strings;

pub use client::{PoolStatus, RedisCache};
