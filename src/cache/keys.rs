//! Cache key generators for upstream requests.
//!
//! A key is a deterministic fingerprint of the request parameters, so two
//! requests that would return the same upstream response share one entry.

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "inspirehep";

/// Collapses runs of whitespace and lowercases a free-text query.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key for a literature search.
#[must_use]
pub fn literature_search(query: &str, sort: &str, size: usize) -> String {
    format!(
        "{}:literature:search:{}:{}:{}",
        CACHE_PREFIX,
        sort,
        size,
        normalize_text(query)
    )
}

/// Key for a literature record fetched by Inspire ID.
#[must_use]
pub fn literature_record(inspire_id: &str) -> String {
    format!("{}:literature:id:{}", CACHE_PREFIX, inspire_id)
}

/// Key for a literature record fetched by arXiv ID.
#[must_use]
pub fn literature_by_arxiv(arxiv_id: &str) -> String {
    format!("{}:literature:arxiv:{}", CACHE_PREFIX, arxiv_id.to_lowercase())
}

/// Key for a literature record fetched by DOI. DOIs are case-insensitive.
#[must_use]
pub fn literature_by_doi(doi: &str) -> String {
    format!("{}:literature:doi:{}", CACHE_PREFIX, doi.to_lowercase())
}

/// Key for an author search.
#[must_use]
pub fn author_search(name: &str, size: usize) -> String {
    format!(
        "{}:authors:search:{}:{}",
        CACHE_PREFIX,
        size,
        normalize_text(name)
    )
}
