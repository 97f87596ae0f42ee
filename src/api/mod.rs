//! API Module
//!
//! HTTP handlers and routing for the InspireHEP tools.
//!
//! # Endpoints
//! - `GET /search` - Search literature
//! - `GET /papers` - Paper details by Inspire ID, arXiv ID or DOI
//! - `GET /authors/papers` - Author publications and citation metrics
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `DELETE /cache/:key` - Invalidate one cache key
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
