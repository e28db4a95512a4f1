//! Token-bucket rate limiting keyed by endpoint
//!
//! Public geocoders throttle aggressively (Nominatim allows one request per
//! second), so callers either test for a token or reserve one and sleep for
//! the returned delay.
//!
//! # Example
//!
//! ```rust
//! use dronemap_core::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::per_second(1));
//! assert!(limiter.try_acquire("search"));
//! assert!(!limiter.try_acquire("search"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Extra requests allowed in a short burst
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_second(1)
    }
}

impl RateLimitConfig {
    /// Per-second rate limit, half of it available as burst
    #[must_use]
    pub fn per_second(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(1),
            burst: max / 2,
        }
    }

    /// Per-minute rate limit, a quarter of it available as burst
    #[must_use]
    pub fn per_minute(max: u32) -> Self {
        Self {
            max_requests: max,
            window: Duration::from_secs(60),
            burst: max / 4,
        }
    }

    /// Bucket capacity
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.max_requests + self.burst
    }

    fn refill_per_sec(&self) -> f64 {
        f64::from(self.max_requests) / self.window.as_secs_f64()
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(config: &RateLimitConfig) -> Self {
        Self {
            tokens: f64::from(config.capacity()),
            last_update: Instant::now(),
        }
    }

    fn refill(&mut self, config: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * config.refill_per_sec())
            .min(f64::from(config.capacity()));
        self.last_update = now;
    }
}

/// Rate limiter with one bucket per key
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            config,
        }
    }

    fn with_bucket<R>(&self, key: &str, f: impl FnOnce(&mut TokenBucket) -> R) -> R {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::full(&self.config));
        bucket.refill(&self.config);
        f(bucket)
    }

    /// Take a token if one is available right now
    #[must_use]
    pub fn try_acquire(&self, key: &str) -> bool {
        self.with_bucket(key, |bucket| {
            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                true
            } else {
                false
            }
        })
    }

    /// Reserve a token, returning how long the caller must wait before using it
    ///
    /// The bucket may go negative; later reservations queue up behind earlier ones.
    #[must_use]
    pub fn reserve(&self, key: &str) -> Duration {
        let rate = self.config.refill_per_sec();
        self.with_bucket(key, |bucket| {
            bucket.tokens -= 1.0;
            if bucket.tokens >= 0.0 {
                Duration::ZERO
            } else {
                Duration::from_secs_f64(-bucket.tokens / rate)
            }
        })
    }

    /// Whole tokens currently available for a key
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn available(&self, key: &str) -> u32 {
        self.with_bucket(key, |bucket| bucket.tokens.max(0.0).floor() as u32)
    }

    /// Forget the bucket for a key
    pub fn reset(&self, key: &str) {
        self.buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }
}
