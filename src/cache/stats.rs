//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Backend ==
/// Which cache tier produced a statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Persistent,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Persistent => f.write_str("persistent"),
        }
    }
}

// == Cache Counters ==
/// Instance-owned counters. They only ever grow for the life of the cache.
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Evictions ==
    /// Adds `count` entries removed by capacity enforcement.
    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    // == Snapshot ==
    /// Builds a statistics snapshot from the counters and tier parameters.
    pub fn snapshot(
        &self,
        backend: Backend,
        size: usize,
        max_size: usize,
        ttl_seconds: f64,
    ) -> CacheStats {
        let hits = self.hits();
        let misses = self.misses();
        CacheStats {
            backend,
            size,
            max_size,
            ttl_seconds,
            hits,
            misses,
            evictions: self.evictions(),
            hit_rate_percent: round_one_decimal(hit_rate(hits, misses)),
        }
    }
}

// == Cache Stats ==
/// Point-in-time statistics for a cache tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub backend: Backend,
    /// Current entry count
    pub size: usize,
    pub max_size: usize,
    pub ttl_seconds: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Hit rate as a percentage, rounded to one decimal
    pub hit_rate_percent: f64,
}

// == Hit Rate ==
/// Hit rate as a percentage: `hits / (hits + misses) * 100`, or 0.0 with no requests.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
