//! Memory Store Module
//!
//! Synchronous TTL + LRU engine behind the in-memory cache tier.

use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;
use tracing::debug;

use crate::cache::{Backend, CacheCounters, CacheEntry, CacheStats};

// == Memory Store ==
/// Key-value storage kept in recency order.
///
/// The LRU end of `entries` is the next eviction candidate; a hit or a set
/// moves a key to the MRU end. Capacity is enforced here rather than by the
/// `LruCache` itself so that every eviction is counted.
#[derive(Debug)]
pub struct MemoryStore {
    entries: LruCache<String, CacheEntry>,
    counters: CacheCounters,
    ttl: Duration,
    max_size: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `ttl` - Maximum age an entry may be served
    /// * `max_size` - Maximum number of entries kept after any `set`
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            counters: CacheCounters::new(),
            ttl,
            max_size,
        }
    }

    // == Get ==
    /// Retrieves a value, promoting it to most-recently-used.
    ///
    /// Expired entries are removed and counted as misses, not evictions.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired_at(now, self.ttl),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.pop(key);
            self.counters.record_miss();
            debug!(key, "memory cache entry expired");
            return None;
        }

        let value = self.entries.get(key).map(|entry| entry.value.clone());
        self.counters.record_hit();
        value
    }

    // == Set ==
    /// Stores or overwrites a value at the most-recently-used end, then evicts
    /// least-recently-used entries until the store fits `max_size`.
    pub fn set(&mut self, key: String, value: Value) {
        self.set_at(key, value, Instant::now());
    }

    pub(crate) fn set_at(&mut self, key: String, value: Value, now: Instant) {
        self.entries.put(key, CacheEntry::with_timestamp(value, now));

        while self.entries.len() > self.max_size {
            match self.entries.pop_lru() {
                Some((evicted, _)) => {
                    self.counters.record_evictions(1);
                    debug!(key = %evicted, "memory cache evicted least recently used entry");
                }
                None => break,
            }
        }
    }

    // == Invalidate ==
    /// Removes a key if present. Absent keys are ignored.
    pub fn invalidate(&mut self, key: &str) {
        self.entries.pop(key);
    }

    // == Clear ==
    /// Removes every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Physical entry count, including entries not yet expired by a read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(
            Backend::Memory,
            self.entries.len(),
            self.max_size,
            self.ttl.as_secs_f64(),
        )
    }
}
