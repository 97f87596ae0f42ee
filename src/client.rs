//! InspireHEP REST client
//!
//! [`LiteratureApi`] is the seam the tools depend on; [`InspireClient`] is the
//! HTTP implementation with a client-side rate limit and per-request timeout.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{InspireError, Result};

const USER_AGENT: &str = concat!("inspirehep_tools/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUESTS_PER_SECOND: f64 = 1.5;
const ERROR_BODY_LIMIT: usize = 200;

// == Literature API Trait ==
/// Upstream operations used by the tools. Every method returns the raw JSON body.
#[async_trait]
pub trait LiteratureApi: Send + Sync {
    /// `GET /literature?q=&sort=&size=`
    async fn search_literature(&self, query: &str, sort: &str, size: usize) -> Result<Value>;

    /// `GET /literature/{id}`
    async fn get_literature_record(&self, inspire_id: &str, fields: Option<&str>)
        -> Result<Value>;

    /// `GET /arxiv/{id}`
    async fn get_literature_by_arxiv(&self, arxiv_id: &str, fields: Option<&str>)
        -> Result<Value>;

    /// `GET /doi/{doi}`
    async fn get_literature_by_doi(&self, doi: &str, fields: Option<&str>) -> Result<Value>;

    /// `GET /authors?q=&size=`
    async fn search_authors(&self, name: &str, size: usize) -> Result<Value>;
}

// == Inspire Client ==
type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// HTTP client for the InspireHEP API.
#[derive(Clone)]
pub struct InspireClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<DirectLimiter>,
}

impl InspireClient {
    /// Creates a client from the API section of the configuration.
    ///
    /// # Arguments
    /// * `config` - Supplies the base URL, timeout and request rate
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(config.api_timeout)
            .ok()
            .filter(|t| !t.is_zero())
            .unwrap_or(Duration::from_secs(30));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| {
                InspireError::api("Failed to build HTTP client", None, Some(err.to_string()))
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limiter: Arc::new(RateLimiter::direct(quota_for(config.requests_per_second))),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a rate-limited GET and maps the status to an error variant.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "InspireHEP request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                warn!(%url, error = %err, "InspireHEP request failed");
                InspireError::api("Failed to reach InspireHEP", None, Some(err.to_string()))
            })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(InspireError::not_found("record", path)),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after_secs(response.headers());
                warn!(?retry_after, "InspireHEP rate limit hit");
                return Err(InspireError::RateLimited { retry_after });
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                let details = body.trim();
                return Err(InspireError::api(
                    "InspireHEP API error",
                    Some(s.as_u16()),
                    (!details.is_empty())
                        .then(|| details.chars().take(ERROR_BODY_LIMIT).collect()),
                ));
            }
            _ => {}
        }

        response.json::<Value>().await.map_err(|err| {
            InspireError::api(
                "Invalid JSON from InspireHEP",
                Some(status.as_u16()),
                Some(err.to_string()),
            )
        })
    }
}

#[async_trait]
impl LiteratureApi for InspireClient {
    async fn search_literature(&self, query: &str, sort: &str, size: usize) -> Result<Value> {
        let params = [
            ("q", query.to_string()),
            ("sort", sort.to_string()),
            ("size", size.to_string()),
        ];
        self.get_json("/literature", &params).await
    }

    async fn get_literature_record(
        &self,
        inspire_id: &str,
        fields: Option<&str>,
    ) -> Result<Value> {
        self.get_json(&format!("/literature/{}", inspire_id), &fields_param(fields))
            .await
    }

    async fn get_literature_by_arxiv(
        &self,
        arxiv_id: &str,
        fields: Option<&str>,
    ) -> Result<Value> {
        self.get_json(&format!("/arxiv/{}", arxiv_id), &fields_param(fields))
            .await
    }

    async fn get_literature_by_doi(&self, doi: &str, fields: Option<&str>) -> Result<Value> {
        self.get_json(&format!("/doi/{}", doi), &fields_param(fields))
            .await
    }

    async fn search_authors(&self, name: &str, size: usize) -> Result<Value> {
        let params = [("q", name.to_string()), ("size", size.to_string())];
        self.get_json("/authors", &params).await
    }
}

// == Helpers ==
fn fields_param(fields: Option<&str>) -> Vec<(&'static str, String)> {
    fields
        .map(|f| vec![("fields", f.to_string())])
        .unwrap_or_default()
}

/// One request per `1 / requests_per_second` seconds, no burst.
fn quota_for(requests_per_second: f64) -> Quota {
    let rps = if requests_per_second.is_finite() && requests_per_second > 0.0 {
        requests_per_second
    } else {
        DEFAULT_REQUESTS_PER_SECOND
    };

    Duration::try_from_secs_f64(1.0 / rps)
        .ok()
        .and_then(Quota::with_period)
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
}

/// Parses the `Retry-After: <seconds>` form.
fn retry_after_secs(headers: &header::HeaderMap) -> Option<f64> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
