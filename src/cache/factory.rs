//! Cache Factory
//!
//! Chooses the cache tier from caller-declared options.

use std::sync::Arc;

use tracing::info;

use crate::cache::{
    Cache, MemoryCache, PersistentCache, DEFAULT_DB_PATH, DEFAULT_MEMORY_MAX_SIZE,
    DEFAULT_PERSISTENT_MAX_SIZE, DEFAULT_TTL_SECONDS,
};

// == Cache Options ==
/// Parameters shared by both tiers, plus the persistence flag.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    pub persistent: bool,
    /// SQLite file location, used only when `persistent` is set
    pub db_path: String,
    pub ttl_seconds: f64,
    pub max_size: usize,
}

impl CacheOptions {
    /// In-memory options with the given parameters.
    pub fn memory(ttl_seconds: f64, max_size: usize) -> Self {
        Self {
            persistent: false,
            db_path: DEFAULT_DB_PATH.to_string(),
            ttl_seconds,
            max_size,
        }
    }

    /// Persistent options backed by the SQLite file at `db_path`.
    pub fn persistent(db_path: impl Into<String>, ttl_seconds: f64, max_size: usize) -> Self {
        Self {
            persistent: true,
            db_path: db_path.into(),
            ttl_seconds,
            max_size,
        }
    }

    /// Default capacity for a tier.
    pub fn default_max_size(persistent: bool) -> usize {
        if persistent {
            DEFAULT_PERSISTENT_MAX_SIZE
        } else {
            DEFAULT_MEMORY_MAX_SIZE
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::memory(DEFAULT_TTL_SECONDS, DEFAULT_MEMORY_MAX_SIZE)
    }
}

// == Create Cache ==
/// Builds the cache tier selected by `options.persistent`.
///
/// The choice is never revised at runtime: a persistent cache whose database
/// cannot be opened degrades to a no-op instead of falling back to memory.
pub async fn create_cache(options: &CacheOptions) -> Arc<dyn Cache> {
    if options.persistent {
        info!(
            path = %options.db_path,
            ttl_seconds = options.ttl_seconds,
            max_size = options.max_size,
            "Using persistent cache"
        );
        Arc::new(
            PersistentCache::open(options.db_path.clone(), options.ttl_seconds, options.max_size)
                .await,
        )
    } else {
        info!(
            ttl_seconds = options.ttl_seconds,
            max_size = options.max_size,
            "Using in-memory cache"
        );
        Arc::new(MemoryCache::new(options.ttl_seconds, options.max_size))
    }
}
