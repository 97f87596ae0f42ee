//! Cache Module
//!
//! Response caching with TTL expiration and bounded size. Two interchangeable
//! tiers implement [`Cache`]: [`MemoryCache`] (LRU eviction, monotonic clock)
//! and [`PersistentCache`] (SQLite, wall clock, insertion-order eviction).
//! Cache operations never fail; storage faults surface only in the logs.

mod entry;
mod factory;
pub mod keys;
mod memory;
mod persistent;
mod stats;
mod store;


use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

// Re-export public types
pub use entry::CacheEntry;
pub use factory::{create_cache, CacheOptions};
pub use memory::MemoryCache;
pub use persistent::PersistentCache;
pub use stats::{hit_rate, Backend, CacheCounters, CacheStats};
pub use store::MemoryStore;

// == Public Constants ==
/// Default maximum entry age: one day
pub const DEFAULT_TTL_SECONDS: f64 = 86400.0;

/// Default capacity of the in-memory tier
pub const DEFAULT_MEMORY_MAX_SIZE: usize = 512;

/// Default capacity of the persistent tier
pub const DEFAULT_PERSISTENT_MAX_SIZE: usize = 2048;

/// Default SQLite file for the persistent tier
pub const DEFAULT_DB_PATH: &str = "inspirehep_cache.db";

// == Cache Trait ==
/// Key-value cache contract shared by both tiers.
///
/// Values are arbitrary JSON. `get` and `set` pairs are not atomic as a unit:
/// two callers that both miss will both store, and the last write wins.
///
/// The persistent tier stores plain strings verbatim, so a string that is
/// itself valid JSON (`"42"`, `"true"`, `"null"`, `"[1]"`) reads back as the
/// decoded number, boolean, null or array. Every other value round-trips
/// unchanged on both tiers.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the live value for `key`, counting a hit or a miss.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, evicting old entries past capacity.
    async fn set(&self, key: &str, value: Value);

    /// Removes `key` if present.
    async fn invalidate(&self, key: &str);

    /// Removes every entry without resetting statistics.
    async fn clear(&self);

    /// Current entry count.
    async fn size(&self) -> usize;

    async fn stats(&self) -> CacheStats;

    fn backend(&self) -> Backend;
}

// == Typed Access ==
/// Typed helpers over [`Cache`] for any serde type.
#[async_trait]
pub trait CacheExt: Cache {
    /// Gets a value and decodes it into `T`. A value of the wrong shape is a miss.
    async fn get_as<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!(key, error = %err, "cached value did not match the requested type");
                None
            }
        }
    }

    /// Encodes and stores `value`. A value that cannot be encoded is dropped.
    async fn set_as<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.set(key, encoded).await,
            Err(err) => debug!(key, error = %err, "value not cacheable, skipping"),
        }
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

// == Helpers ==
/// Converts a TTL in seconds to a `Duration`, clamping invalid input.
pub fn ttl_duration(ttl_seconds: f64) -> Duration {
    if ttl_seconds.is_nan() || ttl_seconds <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(ttl_seconds).unwrap_or(Duration::MAX)
    }
}
