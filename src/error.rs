//! Error types for the InspireHEP tools
//!
//! Every error carries an actionable suggestion suitable for an LLM or end user.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::identifiers::IdentifierKind;

// == Inspire Error Enum ==
/// Unified error type for tool calls and upstream API access.
#[derive(Error, Debug)]
pub enum InspireError {
    /// Tool arguments failed validation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An arXiv ID, DOI or Inspire ID is malformed
    #[error("Invalid {kind} identifier")]
    InvalidIdentifier { kind: IdentifierKind, value: String },

    /// The upstream API has no such resource
    #[error("{resource} not found")]
    NotFound {
        resource: String,
        identifier: String,
    },

    /// The upstream API rejected the request with HTTP 429
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<f64> },

    /// Any other upstream failure, with the HTTP status when one was received
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },
}

impl InspireError {
    // == Constructors ==
    pub fn invalid_identifier(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }

    pub fn api(message: impl Into<String>, status: Option<u16>, details: Option<String>) -> Self {
        Self::Api {
            message: message.into(),
            status,
            details,
        }
    }

    // == Status Code ==
    /// HTTP status reported by (or implied for) the upstream API.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    // == Details ==
    /// Extra context shown between the headline and the suggestion.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::InvalidIdentifier { value, .. } => Some(format!("'{}'", value)),
            Self::NotFound { identifier, .. } => Some(format!("identifier={}", identifier)),
            Self::RateLimited { retry_after } => {
                retry_after.map(|secs| format!("retry after {}s", secs))
            }
            Self::Api { details, .. } => details.clone(),
        }
    }

    // == Suggestion ==
    /// Actionable advice for the caller.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::InvalidIdentifier { kind, .. } => Some(kind.format_hint().to_string()),
            Self::NotFound {
                resource,
                identifier,
            } => Some(format!(
                "No {} found for '{}'. Check the identifier format: Inspire IDs are numeric, \
                 arXiv IDs look like '2301.12345' or 'hep-ph/0123456', DOIs start with '10.'.",
                resource, identifier
            )),
            Self::RateLimited {
                retry_after: Some(secs),
            } => Some(format!("Wait {} seconds before retrying.", secs)),
            Self::RateLimited { retry_after: None } => {
                Some("Wait a few seconds before retrying.".to_string())
            }
            Self::Api {
                status: Some(status),
                ..
            } => Some(api_suggestion(*status).to_string()),
            Self::Api { status: None, .. } => Some(
                "Could not reach InspireHEP. Check network connectivity and try again."
                    .to_string(),
            ),
        }
    }

    // == Describe ==
    /// Full human-readable rendering: headline, details, then suggestion.
    pub fn describe(&self) -> String {
        let mut headline = self.to_string();
        if let Some(status) = self.status_code() {
            headline.push_str(&format!(" (HTTP {})", status));
        }

        let mut parts = vec![headline];
        if let Some(details) = self.details() {
            parts.push(details);
        }
        if let Some(suggestion) = self.suggestion() {
            parts.push(format!("Suggestion: {}", suggestion));
        }
        parts.join(" - ")
    }
}

// == Status Suggestions ==
/// Returns a user-friendly suggestion for an upstream HTTP status code.
pub fn api_suggestion(status: u16) -> &'static str {
    match status {
        400 => "Check the query syntax. InspireHEP uses SPIRES-style search syntax.",
        403 => "Access denied. This resource may require special permissions.",
        404 => "The record was not found. Verify the identifier is correct.",
        429 => "Rate limit exceeded. Wait a moment and try again.",
        500 => "InspireHEP server error. Try again in a few minutes.",
        502 => "InspireHEP is temporarily unavailable. Try again shortly.",
        503 => "InspireHEP is under maintenance. Try again later.",
        _ => "An unexpected API error occurred. Try again later.",
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for InspireError {
    fn into_response(self) -> Response {
        let status = match &self {
            InspireError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            InspireError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            InspireError::NotFound { .. } => StatusCode::NOT_FOUND,
            InspireError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            InspireError::Api { .. } => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.describe()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for tool calls.
pub type Result<T> = std::result::Result<T, InspireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_has_no_suggestion() {
        let err = InspireError::InvalidArgument("size must be positive".to_string());
        assert_eq!(err.describe(), "Invalid argument: size must be positive");
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_api_error_includes_status() {
        let err = InspireError::api("bad request", Some(400), None);
        assert_eq!(err.status_code(), Some(400));
        assert!(err.describe().contains("HTTP 400"));
        assert!(err.describe().contains("SPIRES"));
    }

    #[test]
    fn test_api_error_without_status() {
        let err = InspireError::api("connection reset", None, Some("peer hung up".into()));
        assert!(err.status_code().is_none());
        assert!(err.suggestion().unwrap().contains("connectivity"));
        assert!(err.describe().starts_with("connection reset - peer hung up - Suggestion:"));
    }

    #[test]
    fn test_rate_limited_with_retry_after() {
        let err = InspireError::RateLimited {
            retry_after: Some(30.0),
        };
        assert_eq!(err.status_code(), Some(429));
        let text = err.describe();
        assert!(text.contains("retry after 30s"));
        assert!(text.contains("Wait 30 seconds"));
    }

    #[test]
    fn test_rate_limited_without_retry_after() {
        let err = InspireError::RateLimited { retry_after: None };
        assert!(err.suggestion().unwrap().contains("few seconds"));
    }

    #[test]
    fn test_not_found_suggestion_mentions_identifier_and_formats() {
        let err = InspireError::not_found("paper", "12345");
        assert_eq!(err.status_code(), Some(404));
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("12345"));
        assert!(suggestion.contains("arXiv"));
        assert!(suggestion.contains("DOI"));
    }

    #[test]
    fn test_invalid_identifier_hints() {
        let arxiv = InspireError::invalid_identifier(IdentifierKind::Arxiv, "bad");
        assert!(arxiv.suggestion().unwrap().contains("2301.12345"));
        assert!(arxiv.describe().starts_with("Invalid arXiv identifier - 'bad'"));

        let doi = InspireError::invalid_identifier(IdentifierKind::Doi, "bad");
        assert!(doi.suggestion().unwrap().contains("10.XXXX"));

        let inspire = InspireError::invalid_identifier(IdentifierKind::Inspire, "abc");
        assert!(inspire.suggestion().unwrap().contains("numeric"));

        let unknown = InspireError::invalid_identifier(IdentifierKind::Unknown, "???");
        assert!(unknown.suggestion().unwrap().contains("arXiv"));
    }

    #[test]
    fn test_api_suggestion_fallback() {
        assert!(api_suggestion(418).contains("unexpected"));
        assert!(api_suggestion(503).contains("maintenance"));
    }

    #[test]
    fn test_into_response_status() {
        let response = InspireError::not_found("paper", "1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = InspireError::api("boom", Some(500), None).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
