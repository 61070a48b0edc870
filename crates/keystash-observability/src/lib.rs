//! Keystash Observability
//!
//! Structured logging for keystash binaries, built on `tracing-subscriber`.
//!
//! # Examples
//!
//! ```no_run
//! use keystash_observability::init_logging;
//!
//! init_logging();
//! tracing::info!("ready");
//! ```

pub mod logging;

pub use logging::{LogFormat, default_directive, init_logging};
