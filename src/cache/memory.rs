//! In-Memory Cache Tier
//!
//! Shares a [`MemoryStore`] across concurrent callers.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::cache::{ttl_duration, Backend, Cache, CacheStats, MemoryStore};

// == Memory Cache ==
/// Process-local TTL + LRU cache.
///
/// Every operation holds the store lock only for the synchronous mutation,
/// never across an await point.
#[derive(Debug)]
pub struct MemoryCache {
    store: Mutex<MemoryStore>,
}

impl MemoryCache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `ttl_seconds` - Maximum entry age in seconds; non-positive values expire immediately
    /// * `max_size` - Maximum number of entries
    pub fn new(ttl_seconds: f64, max_size: usize) -> Self {
        Self::from_store(MemoryStore::new(ttl_duration(ttl_seconds), max_size))
    }

    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.store.lock().await.get(key)
    }

    async fn set(&self, key: &str, value: Value) {
        self.store.lock().await.set(key.to_string(), value);
    }

    async fn invalidate(&self, key: &str) {
        self.store.lock().await.invalidate(key);
    }

    async fn clear(&self) {
        self.store.lock().await.clear();
    }

    async fn size(&self) -> usize {
        self.store.lock().await.len()
    }

    async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    fn backend(&self) -> Backend {
        Backend::Memory
    }
}
