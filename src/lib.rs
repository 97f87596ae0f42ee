//! InspireHEP Tools - literature search and paper lookup over the InspireHEP API
//!
//! Wraps the upstream REST API in a small set of tools and caches raw responses
//! in memory or in a SQLite file.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod metadata;
pub mod models;
pub mod tools;

pub use api::AppState;
pub use cache::{create_cache, Cache, CacheExt, CacheOptions, CacheStats};
pub use client::{InspireClient, LiteratureApi};
pub use config::Config;
pub use error::{InspireError, Result};
pub use tools::InspireTools;
