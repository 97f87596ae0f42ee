//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint, including cache
//! population across requests and both cache tiers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use inspirehep_tools::{
    api::create_router, cache::MemoryCache, create_cache, AppState, Cache, CacheOptions, Config,
    InspireClient, InspireError, LiteratureApi, Result,
};
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// == Fake Upstream ==

/// Serves fixed responses and counts upstream calls.
#[derive(Default)]
struct CountingApi {
    calls: AtomicUsize,
}

impl CountingApi {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn paper(id: u64, citations: u64) -> Value {
        json!({
            "id": id,
            "metadata": {
                "titles": [{"title": format!("Paper {}", id)}],
                "citation_count": citations,
                "arxiv_eprints": [{"value": "2301.12345", "categories": ["hep-th"]}]
            },
            "links": {"bibtex": format!("https://inspirehep.net/api/literature/{}?format=bibtex", id)}
        })
    }
}

#[async_trait]
impl LiteratureApi for CountingApi {
    async fn search_literature(&self, query: &str, _sort: &str, size: usize) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.contains("ratelimit") {
            return Err(InspireError::RateLimited {
                retry_after: Some(5.0),
            });
        }
        let hits: Vec<Value> = (1..=size.min(4) as u64)
            .map(|i| Self::paper(i, 10 * i))
            .collect();
        Ok(json!({"hits": {"total": 40, "hits": hits}}))
    }

    async fn get_literature_record(&self, id: &str, _: Option<&str>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match id.parse::<u64>() {
            Ok(n) if n < 1000 => Ok(Self::paper(n, 7)),
            _ => Err(InspireError::not_found("record", id)),
        }
    }

    async fn get_literature_by_arxiv(&self, _: &str, _: Option<&str>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::paper(77, 1))
    }

    async fn get_literature_by_doi(&self, _: &str, _: Option<&str>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::paper(88, 2))
    }

    async fn search_authors(&self, _: &str, _: usize) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "hits": {"hits": [{
                "id": 1010,
                "metadata": {
                    "name": {"value": "Weinberg, Steven"},
                    "ids": [{"schema": "INSPIRE BAI", "value": "S.Weinberg.1"}]
                }
            }]}
        }))
    }
}

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<CountingApi>, Arc<dyn Cache>) {
    let api = Arc::new(CountingApi::default());
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(300.0, 100));
    let state = AppState::new(api.clone(), cache.clone());
    (create_router(state), api, cache)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_endpoint_success() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/search?query=title%3Ahiggs&size=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_results"], 40);
    assert_eq!(json["returned"], 3);
    assert_eq!(json["query"], "title:higgs");
    assert_eq!(json["sort"], "bestmatch");
    assert_eq!(json["papers"][0]["title"], "Paper 1");
    assert_eq!(json["papers"][0]["arxiv_id"], "2301.12345");
}

#[tokio::test]
async fn test_repeated_search_hits_cache() {
    let (app, api, _) = create_test_app();

    send(&app, "GET", "/search?query=higgs&sort=mostcited").await;
    send(&app, "GET", "/search?query=Higgs&sort=mostcited").await;
    send(&app, "GET", "/search?query=higgs&sort=mostrecent").await;

    assert_eq!(api.calls(), 2);

    let (status, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["backend"], "memory");
    assert_eq!(stats["size"], 2);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["hit_rate_percent"], 33.3);
}

#[tokio::test]
async fn test_search_invalid_sort() {
    let (app, api, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/search?query=higgs&sort=random").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid sort option"));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_search_rate_limited() {
    let (app, _, cache) = create_test_app();

    let (status, json) = send(&app, "GET", "/search?query=ratelimit").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(json["error"].as_str().unwrap().contains("Wait 5 seconds"));
    assert_eq!(cache.size().await, 0);
}

// == Paper Endpoint Tests ==

#[tokio::test]
async fn test_paper_by_inspire_id() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/papers?inspire_id=42").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inspire_id"], "42");
    assert_eq!(json["urls"]["arxiv_abs"], "https://arxiv.org/abs/2301.12345");
    assert_eq!(json["urls"]["inspire"], "https://inspirehep.net/literature/42");
    assert!(json["urls"]["bibtex"].as_str().unwrap().ends_with("format=bibtex"));
}

#[tokio::test]
async fn test_paper_by_doi_url() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/papers?doi=https%3A%2F%2Fdoi.org%2F10.1103%2FPhysRevLett.19.1264",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inspire_id"], "88");
}

#[tokio::test]
async fn test_paper_not_found() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/papers?inspire_id=123456").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("paper not found (HTTP 404)"));
    assert!(error.contains("123456"));
}

#[tokio::test]
async fn test_paper_without_identifier() {
    let (app, _, _) = create_test_app();

    let (status, _) = send(&app, "GET", "/papers").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paper_invalid_arxiv_id() {
    let (app, api, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/papers?arxiv_id=not-an-id").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid arXiv identifier"));
    assert_eq!(api.calls(), 0);
}

// == Author Endpoint Tests ==

#[tokio::test]
async fn test_author_papers_by_name() {
    let (app, api, _) = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/authors/papers?author_name=Weinberg%2C%20Steven&sort=mostcited",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["author"]["bai"], "S.Weinberg.1");
    assert_eq!(json["total_papers"], 40);
    assert_eq!(json["returned"], 4);
    assert_eq!(json["metrics"]["total_citations"], 100);
    assert_eq!(json["metrics"]["h_index"], 4);
    assert_eq!(
        json["metrics"]["h_index_note"],
        "Computed from the 4 returned papers"
    );
    assert_eq!(json["metrics"]["average_citations"], 25.0);
    assert_eq!(api.calls(), 2);

    send(
        &app,
        "GET",
        "/authors/papers?author_name=Weinberg%2C%20Steven&sort=mostcited",
    )
    .await;
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn test_author_papers_missing_author() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/authors/papers?sort=mostcited").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("author_name or author_id"));
}

// == Cache Admin Endpoint Tests ==

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let (app, api, _) = create_test_app();

    send(&app, "GET", "/papers?inspire_id=5").await;
    let (status, json) = send(&app, "DELETE", "/cache/inspirehep:literature:id:5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "inspirehep:literature:id:5");

    send(&app, "GET", "/papers?inspire_id=5").await;
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn test_clear_keeps_statistics() {
    let (app, _, _) = create_test_app();

    send(&app, "GET", "/papers?inspire_id=1").await;
    send(&app, "GET", "/papers?inspire_id=2").await;

    let (status, json) = send(&app, "DELETE", "/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);

    let (_, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["misses"], 2);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache_backend"], "memory");
    assert!(json.get("timestamp").is_some());
}

// == Persistent Tier ==

#[tokio::test]
async fn test_persistent_cache_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("api_cache.db");
    let options = CacheOptions::persistent(path.to_string_lossy(), 3600.0, 2048);

    let first_api = Arc::new(CountingApi::default());
    let app = create_router(AppState::new(first_api.clone(), create_cache(&options).await));
    let (status, first) = send(&app, "GET", "/papers?inspire_id=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first_api.calls(), 1);

    let second_api = Arc::new(CountingApi::default());
    let app = create_router(AppState::new(second_api.clone(), create_cache(&options).await));
    let (status, second) = send(&app, "GET", "/papers?inspire_id=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second_api.calls(), 0);
    assert_eq!(first, second);

    let (_, health) = send(&app, "GET", "/health").await;
    assert_eq!(health["cache_backend"], "persistent");
}

// == End to End With HTTP Client ==

#[tokio::test]
async fn test_search_through_http_client() {
    let mut server = Server::new_async().await;
    let upstream = server
        .mock("GET", "/literature")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "collaboration:ATLAS".into()),
            Matcher::UrlEncoded("sort".into(), "mostrecent".into()),
            Matcher::UrlEncoded("size".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"hits": {"total": 2, "hits": [{"id": 1}, {"id": 2}]}}).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let config = Config {
        api_base_url: server.url(),
        requests_per_second: 1000.0,
        ..Config::default()
    };
    let client = InspireClient::new(&config).unwrap();
    let cache = create_cache(&config.cache_options()).await;
    let app = create_router(AppState::new(Arc::new(client), cache));

    let uri = "/search?query=collaboration%3AATLAS&sort=mostrecent&size=2";
    let (status, json) = send(&app, "GET", uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["returned"], 2);

    let (status, _) = send(&app, "GET", uri).await;
    assert_eq!(status, StatusCode::OK);

    upstream.assert_async().await;
}
