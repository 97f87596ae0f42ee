//! Configuration Module
//!
//! Loads server configuration from `INSPIREHEP_`-prefixed environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{CacheOptions, DEFAULT_DB_PATH, DEFAULT_TTL_SECONDS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// A value that fails to parse falls back to its default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the InspireHEP REST API
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub api_timeout: f64,
    /// Client-side rate limit toward the upstream API
    pub requests_per_second: f64,
    /// Maximum age of a cache entry in seconds
    pub cache_ttl: f64,
    /// Maximum number of cache entries
    pub cache_max_size: usize,
    /// Use the SQLite-backed cache instead of the in-memory one
    pub cache_persistent: bool,
    /// SQLite file for the persistent cache
    pub cache_db_path: String,
    /// Log level for this crate's targets
    pub log_level: String,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `INSPIREHEP_API_BASE_URL` - API root (default: https://inspirehep.net/api)
    /// - `INSPIREHEP_API_TIMEOUT` - Request timeout in seconds (default: 30.0)
    /// - `INSPIREHEP_REQUESTS_PER_SECOND` - Upstream rate limit (default: 1.5)
    /// - `INSPIREHEP_CACHE_TTL` - Cache TTL in seconds (default: 86400.0)
    /// - `INSPIREHEP_CACHE_MAX_SIZE` - Cache capacity (default: 512 in memory, 2048 persistent)
    /// - `INSPIREHEP_CACHE_PERSISTENT` - `1`, `true` or `yes` enables SQLite (default: false)
    /// - `INSPIREHEP_CACHE_DB_PATH` - SQLite file (default: inspirehep_cache.db)
    /// - `INSPIREHEP_LOG_LEVEL` - Log level (default: info)
    /// - `INSPIREHEP_SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_persistent = lookup("INSPIREHEP_CACHE_PERSISTENT")
            .map(|v| parse_bool(&v))
            .unwrap_or(defaults.cache_persistent);

        Self {
            api_base_url: lookup("INSPIREHEP_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout: parse_var(&lookup, "INSPIREHEP_API_TIMEOUT")
                .unwrap_or(defaults.api_timeout),
            requests_per_second: parse_var(&lookup, "INSPIREHEP_REQUESTS_PER_SECOND")
                .unwrap_or(defaults.requests_per_second),
            cache_ttl: parse_var(&lookup, "INSPIREHEP_CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_max_size: parse_var(&lookup, "INSPIREHEP_CACHE_MAX_SIZE")
                .unwrap_or_else(|| CacheOptions::default_max_size(cache_persistent)),
            cache_persistent,
            cache_db_path: lookup("INSPIREHEP_CACHE_DB_PATH").unwrap_or(defaults.cache_db_path),
            log_level: lookup("INSPIREHEP_LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_level),
            server_port: parse_var(&lookup, "INSPIREHEP_SERVER_PORT")
                .unwrap_or(defaults.server_port),
        }
    }

    /// Factory input for [`crate::cache::create_cache`].
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            persistent: self.cache_persistent,
            db_path: self.cache_db_path.clone(),
            ttl_seconds: self.cache_ttl,
            max_size: self.cache_max_size,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://inspirehep.net/api".to_string(),
            api_timeout: 30.0,
            requests_per_second: 1.5,
            cache_ttl: DEFAULT_TTL_SECONDS,
            cache_max_size: CacheOptions::default_max_size(false),
            cache_persistent: false,
            cache_db_path: DEFAULT_DB_PATH.to_string(),
            log_level: "info".to_string(),
            server_port: 3000,
        }
    }
}

/// Parses `key` as `T`, ignoring surrounding whitespace; `None` when unset or malformed.
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
