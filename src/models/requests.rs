//! Request DTOs for the HTTP API
//!
//! All tool endpoints take their arguments from the query string.

use serde::Deserialize;

/// Query for `GET /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// InspireHEP search expression
    pub query: String,
    /// `bestmatch`, `mostrecent` or `mostcited`
    #[serde(default)]
    pub sort: Option<String>,
    /// Page size, clamped to 1..=100
    #[serde(default)]
    pub size: Option<i64>,
}

/// Query for `GET /papers`
///
/// At least one identifier is required; the tool reports a missing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperQuery {
    #[serde(default)]
    pub inspire_id: Option<String>,
    #[serde(default)]
    pub arxiv_id: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Query for `GET /authors/papers`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPapersQuery {
    /// Name in "Last, First" form
    #[serde(default)]
    pub author_name: Option<String>,
    /// INSPIRE BAI such as `S.Weinberg.1`
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
}
