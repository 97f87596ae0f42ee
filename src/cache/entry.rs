//! Cache Entry Module
//!
//! Defines the structure for individual in-memory cache entries.

use std::time::{Duration, Instant};

use serde_json::Value;

// == Cache Entry ==
/// A cached value stamped with the monotonic time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Monotonic store time, immune to wall-clock adjustment
    pub stored_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current monotonic time.
    pub fn new(value: Value) -> Self {
        Self::with_timestamp(value, Instant::now())
    }

    /// Creates an entry stamped with an explicit store time.
    pub fn with_timestamp(value: Value, stored_at: Instant) -> Self {
        Self { value, stored_at }
    }

    // == Age ==
    /// Time elapsed between storing the entry and `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` as of `now`.
    ///
    /// An entry is expired only once its age strictly exceeds the TTL, so an
    /// entry read exactly at `stored_at + ttl` is still served.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        self.age_at(now) > ttl
    }
}
