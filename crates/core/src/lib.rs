//! Core utilities shared by the dronemap crates
//!
//! This crate provides the pieces every other crate leans on:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//! - **Retry**: exponential backoff policy and a circuit breaker
//! - **Rate limiting**: token buckets keyed by endpoint
//!
//! # Example
//!
//! ```rust,no_run
//! use dronemap_core::config::Config;
//!
//! let config = Config::load(None).expect("config should load");
//! println!("Initial zoom: {}", config.schema.map.zoom);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, Language};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryConfig};
}
