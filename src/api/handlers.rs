//! API Handlers
//!
//! HTTP request handlers for each endpoint. Tool errors render through
//! [`crate::error::InspireError`]'s `IntoResponse`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{Cache, CacheStats};
use crate::client::LiteratureApi;
use crate::error::Result;
use crate::metadata::PaperDetail;
use crate::models::{
    AuthorPapersQuery, ClearResponse, HealthResponse, InvalidateResponse, PaperQuery, SearchQuery,
};
use crate::tools::{AuthorPapers, InspireTools, SearchResults};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub tools: InspireTools,
}

impl AppState {
    /// Creates a new AppState around an upstream client and a cache.
    pub fn new(api: Arc<dyn LiteratureApi>, cache: Arc<dyn Cache>) -> Self {
        Self {
            tools: InspireTools::new(api, cache),
        }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        self.tools.cache()
    }
}

/// Handler for GET /search
pub async fn search_handler(
    State(state): State<AppState>,
    Query(req): Query<SearchQuery>,
) -> Result<Json<SearchResults>> {
    let results = state
        .tools
        .search_papers(&req.query, req.sort.as_deref(), req.size)
        .await?;
    Ok(Json(results))
}

/// Handler for GET /papers
pub async fn paper_handler(
    State(state): State<AppState>,
    Query(req): Query<PaperQuery>,
) -> Result<Json<PaperDetail>> {
    let detail = state
        .tools
        .get_paper_details(
            req.inspire_id.as_deref(),
            req.arxiv_id.as_deref(),
            req.doi.as_deref(),
        )
        .await?;
    Ok(Json(detail))
}

/// Handler for GET /authors/papers
pub async fn author_papers_handler(
    State(state): State<AppState>,
    Query(req): Query<AuthorPapersQuery>,
) -> Result<Json<AuthorPapers>> {
    let papers = state
        .tools
        .get_author_papers(
            req.author_name.as_deref(),
            req.author_id.as_deref(),
            req.sort.as_deref(),
            req.size,
        )
        .await?;
    Ok(Json(papers))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache().stats().await)
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cache = state.cache();
    let removed = cache.size().await;
    cache.clear().await;
    Json(ClearResponse::new(removed))
}

/// Handler for DELETE /cache/:key
///
/// Succeeds whether or not the key was present.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    state.cache().invalidate(&key).await;
    Json(InvalidateResponse::new(key))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache().backend()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{keys, Backend, MemoryCache};
    use crate::error::InspireError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Upstream that serves one canned search page and no records.
    struct CannedApi;

    #[async_trait]
    impl LiteratureApi for CannedApi {
        async fn search_literature(&self, _: &str, _: &str, _: usize) -> Result<Value> {
            Ok(json!({"hits": {"total": 1, "hits": [{"id": 5, "metadata": {"citation_count": 3}}]}}))
        }

        async fn get_literature_record(&self, id: &str, _: Option<&str>) -> Result<Value> {
            Err(InspireError::not_found("record", id))
        }

        async fn get_literature_by_arxiv(&self, id: &str, _: Option<&str>) -> Result<Value> {
            Err(InspireError::not_found("record", id))
        }

        async fn get_literature_by_doi(&self, doi: &str, _: Option<&str>) -> Result<Value> {
            Err(InspireError::not_found("record", doi))
        }

        async fn search_authors(&self, _: &str, _: usize) -> Result<Value> {
            Ok(json!({"hits": {"hits": []}}))
        }
    }

    fn test_state() -> AppState {
        AppState::new(Arc::new(CannedApi), Arc::new(MemoryCache::new(300.0, 100)))
    }

    fn search(query: &str) -> Query<SearchQuery> {
        Query(SearchQuery {
            query: query.to_string(),
            sort: None,
            size: None,
        })
    }

    #[tokio::test]
    async fn test_search_handler_populates_cache() {
        let state = test_state();

        let response = search_handler(State(state.clone()), search("higgs")).await.unwrap();

        assert_eq!(response.total_results, 1);
        assert_eq!(response.papers[0].inspire_id, "5");
        let key = keys::literature_search("higgs", "bestmatch", 10);
        assert!(state.cache().get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_paper_handler_not_found() {
        let result = paper_handler(
            State(test_state()),
            Query(PaperQuery {
                inspire_id: Some("999".to_string()),
                ..PaperQuery::default()
            }),
        )
        .await;

        assert!(matches!(result, Err(InspireError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_author_papers_handler() {
        let result = author_papers_handler(
            State(test_state()),
            Query(AuthorPapersQuery {
                author_id: Some("A.B.1".to_string()),
                ..AuthorPapersQuery::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.metrics.h_index, 1);
    }

    #[tokio::test]
    async fn test_stats_clear_and_invalidate() {
        let state = test_state();
        state.cache().set("a", json!(1)).await;
        state.cache().set("b", json!(2)).await;

        invalidate_handler(State(state.clone()), Path("a".to_string())).await;
        let stats = stats_handler(State(state.clone())).await;
        assert_eq!(stats.size, 1);

        let cleared = clear_handler(State(state.clone())).await;
        assert_eq!(cleared.removed, 1);
        assert_eq!(state.cache().size().await, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.cache_backend, Backend::Memory);
    }
}
