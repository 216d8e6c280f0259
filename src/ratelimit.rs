//! Fixed-window request limiter for callers that expose verification to
//! untrusted clients.
//!
//! The verification engine never consults it.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateVerdict {
    pub allowed: bool,
    pub remaining: u32,
}

/// Something that can count requests per key.
pub trait RateLimitStore {
    /// Record one request for `key` and report whether it fits in `limit`.
    fn check(&self, key: &str, limit: u32) -> RateVerdict;
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug)]
pub struct InMemoryRateLimiter {
    window: Duration,
    buckets: DashMap<String, Bucket>,
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            buckets: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Keys currently holding a window.
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    fn check_at(&self, key: &str, limit: u32, now: Instant) -> RateVerdict {
        let key = if key.is_empty() { "unknown" } else { key };
        if !self.buckets.contains_key(key) {
            // expired windows are dropped whenever a new key arrives
            self.buckets.retain(|_, bucket| now < bucket.reset_at);
        }

        let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
            count: 0,
            reset_at: now,
        });
        if now >= bucket.reset_at {
            *bucket = Bucket {
                count: 1,
                reset_at: now + self.window,
            };
            return RateVerdict {
                allowed: true,
                remaining: limit.saturating_sub(1),
            };
        }
        if bucket.count >= limit {
            debug!(%key, limit, "rate limit exceeded");
            return RateVerdict {
                allowed: false,
                remaining: 0,
            };
        }
        bucket.count += 1;
        RateVerdict {
            allowed: true,
            remaining: limit - bucket.count,
        }
    }
}

impl RateLimitStore for InMemoryRateLimiter {
    fn check(&self, key: &str, limit: u32) -> RateVerdict {
        self.check_at(key, limit, Instant::now())
    }
}
