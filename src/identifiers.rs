//! Identifier Module
//!
//! Normalizes arXiv IDs, DOIs and Inspire record IDs to their canonical forms.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{InspireError, Result};

// == Patterns ==
/// New style arXiv: YYMM.NNNNN with optional version suffix
static ARXIV_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}\.\d{4,5})(v\d+)?$").expect("valid regex"));
/// Old style arXiv: archive/YYMMNNN with optional version suffix
static ARXIV_OLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z-]+/\d{7})(v\d+)?$").expect("valid regex"));
static ARXIV_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"arxiv\.org/abs/(.+?)(?:v\d+)?$").expect("valid regex"));
static DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^10\.\d{4,9}/\S+$").expect("valid regex"));
static DOI_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"doi\.org/(10\.\d{4,9}/\S+)$").expect("valid regex"));
static INSPIRE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

// == Identifier Kind ==
/// The kind of literature identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Inspire,
    Arxiv,
    Doi,
    /// Could not be classified
    Unknown,
}

impl IdentifierKind {
    /// Format hint shown when an identifier of this kind is malformed.
    pub fn format_hint(&self) -> &'static str {
        match self {
            Self::Arxiv => {
                "Expected formats: '2301.12345', 'hep-ph/0123456', or 'https://arxiv.org/abs/...'"
            }
            Self::Doi => "Expected format: '10.XXXX/...' or 'https://doi.org/10.XXXX/...'",
            Self::Inspire => "Expected format: a numeric ID like '3456' or '1234567'",
            Self::Unknown => "Provide an arXiv ID, DOI, or numeric Inspire ID.",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inspire => "Inspire",
            Self::Arxiv => "arXiv",
            Self::Doi => "DOI",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

// == arXiv ==
/// Normalizes an arXiv identifier to its bare form without version.
///
/// Accepts `2301.12345`, `2301.12345v2`, `hep-ph/0123456` and
/// `https://arxiv.org/abs/...` URLs.
pub fn normalize_arxiv_id(raw: &str) -> Result<String> {
    let mut candidate = raw.trim();

    if let Some(captures) = ARXIV_URL.captures(candidate) {
        if let Some(inner) = captures.get(1) {
            candidate = inner.as_str();
        }
    }

    ARXIV_NEW
        .captures(candidate)
        .or_else(|| ARXIV_OLD.captures(candidate))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| InspireError::invalid_identifier(IdentifierKind::Arxiv, candidate))
}

// == DOI ==
/// Normalizes a DOI, stripping any `doi.org` URL prefix.
pub fn normalize_doi(raw: &str) -> Result<String> {
    let mut candidate = raw.trim();

    if let Some(captures) = DOI_URL.captures(candidate) {
        if let Some(inner) = captures.get(1) {
            candidate = inner.as_str();
        }
    }

    if DOI.is_match(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(InspireError::invalid_identifier(IdentifierKind::Doi, candidate))
    }
}

// == Inspire ID ==
/// Validates a purely numeric Inspire record ID.
pub fn normalize_inspire_id(raw: &str) -> Result<String> {
    let candidate = raw.trim();
    if INSPIRE_ID.is_match(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(InspireError::invalid_identifier(
            IdentifierKind::Inspire,
            candidate,
        ))
    }
}

// == Detection ==
/// Detects the identifier kind and returns it with the normalized value.
pub fn detect_identifier(raw: &str) -> Result<(IdentifierKind, String)> {
    let candidate = raw.trim();

    if candidate.starts_with("10.") || candidate.contains("doi.org/") {
        return Ok((IdentifierKind::Doi, normalize_doi(candidate)?));
    }

    if candidate.contains("arxiv.org") {
        return Ok((IdentifierKind::Arxiv, normalize_arxiv_id(candidate)?));
    }

    if ARXIV_OLD.is_match(candidate) || ARXIV_NEW.is_match(candidate) {
        return Ok((IdentifierKind::Arxiv, normalize_arxiv_id(candidate)?));
    }

    if INSPIRE_ID.is_match(candidate) {
        return Ok((IdentifierKind::Inspire, candidate.to_string()));
    }

    Err(InspireError::invalid_identifier(
        IdentifierKind::Unknown,
        candidate,
    ))
}
