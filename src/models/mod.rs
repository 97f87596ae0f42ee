//! Request and Response models for the HTTP API
//!
//! Query-string DTOs for the tool endpoints and small bodies for the cache
//! administration and health endpoints. Tool results serialize themselves.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{AuthorPapersQuery, PaperQuery, SearchQuery};
pub use responses::{ClearResponse, HealthResponse, InvalidateResponse};
