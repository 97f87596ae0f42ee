//! Literature tools
//!
//! Each tool validates its arguments, fingerprints the upstream request with
//! [`crate::cache::keys`], serves the raw response from the cache when it can,
//! and otherwise fetches it through [`LiteratureApi`] and stores it.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{keys, Cache};
use crate::client::LiteratureApi;
use crate::error::{InspireError, Result};
use crate::identifiers::{normalize_arxiv_id, normalize_doi, normalize_inspire_id};
use crate::metadata::{
    build_paper_detail, parse_author_record, parse_paper_metadata, search_hits, AuthorInfo,
    PaperDetail, PaperSummary,
};

// == Constants ==
pub const SEARCH_SORTS: &[&str] = &["bestmatch", "mostrecent", "mostcited"];
pub const AUTHOR_SORTS: &[&str] = &["mostrecent", "mostcited"];

pub const DEFAULT_SEARCH_SORT: &str = "bestmatch";
pub const DEFAULT_AUTHOR_SORT: &str = "mostrecent";
pub const DEFAULT_SEARCH_SIZE: i64 = 10;
pub const DEFAULT_AUTHOR_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Record fields requested by the detail tool.
pub const DETAIL_FIELDS: &str = "titles,authors.full_name,authors.affiliations,authors.ids,\
abstracts,arxiv_eprints,dois,publication_info,collaborations,citation_count,\
citation_count_without_self_citations,earliest_date,legacy_creation_date,references,\
documents,urls,keywords,inspire_categories,texkeys,report_numbers,document_type,number_of_pages";

// == Response Types ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub total_results: u64,
    pub returned: usize,
    pub query: String,
    pub sort: String,
    pub papers: Vec<PaperSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorMetrics {
    pub total_citations: u64,
    pub h_index: usize,
    pub h_index_note: String,
    pub average_citations: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorPapers {
    pub author: AuthorInfo,
    pub total_papers: u64,
    pub returned: usize,
    pub sort: String,
    pub metrics: AuthorMetrics,
    pub papers: Vec<PaperSummary>,
}

enum AuthorRef<'a> {
    Bai(&'a str),
    Name(&'a str),
}

// == Tools ==
/// Tool set bound to one upstream client and one cache.
#[derive(Clone)]
pub struct InspireTools {
    api: Arc<dyn LiteratureApi>,
    cache: Arc<dyn Cache>,
}

impl InspireTools {
    pub fn new(api: Arc<dyn LiteratureApi>, cache: Arc<dyn Cache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Searches literature with InspireHEP query syntax (`author:ellis`,
    /// `title:higgs`, `collaboration:ATLAS`, or free text).
    ///
    /// # Arguments
    /// * `query` - Search query, must not be blank
    /// * `sort` - One of `bestmatch`, `mostrecent`, `mostcited` (default `bestmatch`)
    /// * `size` - Page size, clamped to 1..=100 (default 10)
    pub async fn search_papers(
        &self,
        query: &str,
        sort: Option<&str>,
        size: Option<i64>,
    ) -> Result<SearchResults> {
        if query.trim().is_empty() {
            return Err(InspireError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }
        let sort = validate_sort(sort.unwrap_or(DEFAULT_SEARCH_SORT), SEARCH_SORTS)?;
        let size = clamp_size(size.unwrap_or(DEFAULT_SEARCH_SIZE));

        let raw = self
            .cached(keys::literature_search(query, sort, size), || {
                self.api.search_literature(query, sort, size)
            })
            .await?;

        let (total, records) = search_hits(&raw);
        let papers: Vec<PaperSummary> = records.iter().map(parse_paper_metadata).collect();

        Ok(SearchResults {
            total_results: total,
            returned: papers.len(),
            query: query.to_string(),
            sort: sort.to_string(),
            papers,
        })
    }

    /// Fetches full metadata for one paper. Lookup order is Inspire ID, then
    /// arXiv ID, then DOI; identifiers may be given in any accepted format.
    pub async fn get_paper_details(
        &self,
        inspire_id: Option<&str>,
        arxiv_id: Option<&str>,
        doi: Option<&str>,
    ) -> Result<PaperDetail> {
        let inspire_id = present(inspire_id);
        let arxiv_id = present(arxiv_id);
        let doi = present(doi);

        let fetched = if let Some(raw) = inspire_id {
            let id = normalize_inspire_id(raw)?;
            self.cached(keys::literature_record(&id), || {
                self.api.get_literature_record(&id, Some(DETAIL_FIELDS))
            })
            .await
            .map_err(|err| paper_not_found(err, raw))
        } else if let Some(raw) = arxiv_id {
            let id = normalize_arxiv_id(raw)?;
            self.cached(keys::literature_by_arxiv(&id), || {
                self.api.get_literature_by_arxiv(&id, Some(DETAIL_FIELDS))
            })
            .await
            .map_err(|err| paper_not_found(err, raw))
        } else if let Some(raw) = doi {
            let id = normalize_doi(raw)?;
            self.cached(keys::literature_by_doi(&id), || {
                self.api.get_literature_by_doi(&id, Some(DETAIL_FIELDS))
            })
            .await
            .map_err(|err| paper_not_found(err, raw))
        } else {
            return Err(InspireError::InvalidArgument(
                "At least one identifier must be provided (inspire_id, arxiv_id, or doi)"
                    .to_string(),
            ));
        };

        Ok(build_paper_detail(&fetched?))
    }

    /// Lists an author's papers with aggregate citation metrics.
    ///
    /// A name such as `"Weinberg, Steven"` is first resolved to an INSPIRE BAI;
    /// `author_id` is used as a BAI directly.
    pub async fn get_author_papers(
        &self,
        author_name: Option<&str>,
        author_id: Option<&str>,
        sort: Option<&str>,
        size: Option<i64>,
    ) -> Result<AuthorPapers> {
        let target = match (present(author_id), present(author_name)) {
            (Some(bai), _) => AuthorRef::Bai(bai),
            (None, Some(name)) => AuthorRef::Name(name),
            (None, None) => {
                return Err(InspireError::InvalidArgument(
                    "Either author_name or author_id must be provided".to_string(),
                ))
            }
        };
        let sort = validate_sort(sort.unwrap_or(DEFAULT_AUTHOR_SORT), AUTHOR_SORTS)?;
        let size = clamp_size(size.unwrap_or(DEFAULT_AUTHOR_SIZE));

        let (bai, author) = match target {
            AuthorRef::Bai(bai) => (bai.to_string(), AuthorInfo::from_bai(bai)),
            AuthorRef::Name(name) => self.resolve_author(name).await,
        };

        let query = format!("a {}", bai);
        let raw = self
            .cached(keys::literature_search(&query, sort, size), || {
                self.api.search_literature(&query, sort, size)
            })
            .await?;

        let (total, records) = search_hits(&raw);
        let papers: Vec<PaperSummary> = records.iter().map(parse_paper_metadata).collect();
        let citations: Vec<u64> = papers.iter().map(|p| p.citation_count).collect();

        Ok(AuthorPapers {
            author,
            total_papers: total,
            returned: papers.len(),
            sort: sort.to_string(),
            metrics: author_metrics(&citations, total),
            papers,
        })
    }

    /// Resolves a display name to `(bai, info)`, falling back to the raw name.
    async fn resolve_author(&self, name: &str) -> (String, AuthorInfo) {
        let lookup = self
            .cached(keys::author_search(name, 1), || self.api.search_authors(name, 1))
            .await;

        match lookup {
            Ok(response) => {
                if let Some(info) = parse_author_record(&response, name) {
                    if let Some(bai) = info.bai.clone() {
                        return (bai, info);
                    }
                }
                debug!(name, "no BAI found for author, searching by name");
            }
            Err(err) => debug!(name, error = %err, "author resolution failed, searching by name"),
        }

        (name.to_string(), AuthorInfo::unresolved(name))
    }

    /// Returns the cached response for `key`, or fetches and caches it.
    async fn cached<F, Fut>(&self, key: String, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "cache hit");
            return Ok(hit);
        }

        debug!(%key, "cache miss, fetching from InspireHEP");
        let value = fetch().await?;
        self.cache.set(&key, value.clone()).await;
        Ok(value)
    }
}

// == Metrics ==
/// Largest h such that h papers have at least h citations each.
pub fn compute_h_index(citations: &[u64]) -> usize {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
        .iter()
        .enumerate()
        .take_while(|&(i, &count)| count > i as u64)
        .count()
}

fn author_metrics(citations: &[u64], total_papers: u64) -> AuthorMetrics {
    let total_citations: u64 = citations.iter().sum();
    let returned = citations.len();

    let h_index_note = if (returned as u64) < total_papers {
        format!("Computed from the {} returned papers", returned)
    } else {
        "Computed from all papers".to_string()
    };

    let average_citations = if returned == 0 {
        0.0
    } else {
        (total_citations as f64 / returned as f64 * 10.0).round() / 10.0
    };

    AuthorMetrics {
        total_citations,
        h_index: compute_h_index(citations),
        h_index_note,
        average_citations,
    }
}

// == Helpers ==
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn validate_sort<'a>(sort: &'a str, allowed: &[&str]) -> Result<&'a str> {
    if allowed.contains(&sort) {
        Ok(sort)
    } else {
        Err(InspireError::InvalidArgument(format!(
            "Invalid sort option '{}'. Must be one of: {}",
            sort,
            allowed.join(", ")
        )))
    }
}

fn clamp_size(size: i64) -> usize {
    size.clamp(1, MAX_PAGE_SIZE as i64) as usize
}

fn paper_not_found(err: InspireError, raw: &str) -> InspireError {
    match err {
        InspireError::NotFound { .. } => InspireError::not_found("paper", raw),
        other => other,
    }
}
