//! Reshaping of raw InspireHEP records into compact, LLM-friendly summaries.
//!
//! Every accessor tolerates missing or oddly typed fields: absent data becomes
//! an empty string, an empty list, `None` or zero rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authors kept in a search summary.
pub const SUMMARY_AUTHOR_LIMIT: usize = 10;

/// Authors kept in a detail view.
pub const DETAIL_AUTHOR_LIMIT: usize = 50;

const INSPIRE_LITERATURE_URL: &str = "https://inspirehep.net/literature";
const BAI_SCHEMA: &str = "INSPIRE BAI";

static NULL: Value = Value::Null;

// == Types ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub full_name: String,
    pub affiliations: Vec<String>,
    /// INSPIRE BAIs, only populated in detail views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspire_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub journal_title: String,
    pub journal_volume: String,
    pub page_start: String,
    pub year: Option<i64>,
}

/// Standard metadata for one literature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub inspire_id: String,
    pub title: String,
    pub authors: Vec<AuthorSummary>,
    pub total_authors: usize,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub arxiv_id: Option<String>,
    pub arxiv_categories: Vec<String>,
    pub doi: Option<String>,
    pub publication: Option<Publication>,
    pub collaborations: Vec<String>,
    pub citation_count: u64,
    pub date: String,
    pub inspire_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_abs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulltext: Option<String>,
    pub inspire: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bibtex: Option<String>,
}

/// Full metadata for a single paper, as returned by the detail tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDetail {
    #[serde(flatten)]
    pub summary: PaperSummary,
    pub references_count: usize,
    pub citation_count_without_self_citations: u64,
    pub document_type: Vec<String>,
    pub keywords: Vec<String>,
    pub inspire_categories: Vec<String>,
    pub texkey: Option<String>,
    pub report_numbers: Vec<String>,
    pub number_of_pages: Option<u64>,
    pub urls: PaperUrls,
}

/// Author identity resolved through the authors API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_name: Option<String>,
    pub bai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspire_author_id: Option<String>,
}

impl AuthorInfo {
    /// Info for a caller-supplied BAI.
    pub fn from_bai(bai: impl Into<String>) -> Self {
        Self {
            bai: Some(bai.into()),
            ..Self::default()
        }
    }

    /// Info for a name that could not be resolved to a BAI.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

// == Value Helpers ==
fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    array(value, key).first()
}

/// Field rendered as text; numbers are stringified, anything else is empty.
fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn opt_text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn values_of(items: &[Value], key: &str) -> Vec<String> {
    items.iter().map(|item| text(item, key)).collect()
}

fn strings(value: &Value, key: &str) -> Vec<String> {
    array(value, key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn metadata_of(record: &Value) -> &Value {
    record.get("metadata").unwrap_or(&NULL)
}

fn parse_author(author: &Value, with_ids: bool) -> AuthorSummary {
    let inspire_ids = with_ids.then(|| {
        array(author, "ids")
            .iter()
            .filter(|id| id.get("schema").and_then(Value::as_str) == Some(BAI_SCHEMA))
            .map(|id| text(id, "value"))
            .collect()
    });

    AuthorSummary {
        full_name: text(author, "full_name"),
        affiliations: values_of(array(author, "affiliations"), "value"),
        inspire_ids,
    }
}

// == Parsing ==
/// Extracts standard metadata from one element of a search response's `hits.hits`.
pub fn parse_paper_metadata(record: &Value) -> PaperSummary {
    let meta = metadata_of(record);
    let inspire_id = text(record, "id");

    let raw_authors = array(meta, "authors");
    let authors = raw_authors
        .iter()
        .take(SUMMARY_AUTHOR_LIMIT)
        .map(|a| parse_author(a, false))
        .collect();

    let eprint = first(meta, "arxiv_eprints");
    let publication = first(meta, "publication_info").map(|p| Publication {
        journal_title: text(p, "journal_title"),
        journal_volume: text(p, "journal_volume"),
        page_start: text(p, "page_start"),
        year: p.get("year").and_then(Value::as_i64),
    });

    let date = opt_text(meta, "earliest_date")
        .or_else(|| opt_text(meta, "legacy_creation_date"))
        .unwrap_or_default();

    PaperSummary {
        title: first(meta, "titles")
            .map(|t| text(t, "title"))
            .unwrap_or_default(),
        authors,
        total_authors: raw_authors.len(),
        abstract_text: first(meta, "abstracts")
            .map(|a| text(a, "value"))
            .unwrap_or_default(),
        arxiv_id: eprint.map(|e| text(e, "value")),
        arxiv_categories: eprint.map(|e| strings(e, "categories")).unwrap_or_default(),
        doi: first(meta, "dois").map(|d| text(d, "value")),
        publication,
        collaborations: values_of(array(meta, "collaborations"), "value"),
        citation_count: meta
            .get("citation_count")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        date,
        inspire_url: format!("{}/{}", INSPIRE_LITERATURE_URL, inspire_id),
        inspire_id,
    }
}

/// Builds the detail view for a full literature record.
pub fn build_paper_detail(record: &Value) -> PaperDetail {
    let mut summary = parse_paper_metadata(record);
    let meta = metadata_of(record);

    summary.authors = array(meta, "authors")
        .iter()
        .take(DETAIL_AUTHOR_LIMIT)
        .map(|a| parse_author(a, true))
        .collect();

    let urls = PaperUrls {
        arxiv_abs: summary
            .arxiv_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://arxiv.org/abs/{}", id)),
        arxiv_pdf: summary
            .arxiv_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://arxiv.org/pdf/{}", id)),
        doi: summary
            .doi
            .as_ref()
            .filter(|doi| !doi.is_empty())
            .map(|doi| format!("https://doi.org/{}", doi)),
        fulltext: first(meta, "documents").and_then(|d| opt_text(d, "url")),
        inspire: summary.inspire_url.clone(),
        bibtex: record
            .get("links")
            .and_then(|links| opt_text(links, "bibtex"))
            .filter(|url| !url.is_empty()),
    };

    PaperDetail {
        references_count: array(meta, "references").len(),
        citation_count_without_self_citations: meta
            .get("citation_count_without_self_citations")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        document_type: strings(meta, "document_type"),
        keywords: values_of(array(meta, "keywords"), "value")
            .into_iter()
            .filter(|k| !k.is_empty())
            .collect(),
        inspire_categories: values_of(array(meta, "inspire_categories"), "term"),
        texkey: first(meta, "texkeys")
            .and_then(Value::as_str)
            .map(str::to_string),
        report_numbers: values_of(array(meta, "report_numbers"), "value"),
        number_of_pages: meta.get("number_of_pages").and_then(Value::as_u64),
        urls,
        summary,
    }
}

/// Reads the best match of an authors search. Returns `None` unless the
/// author carries an INSPIRE BAI.
pub fn parse_author_record(search_response: &Value, queried_name: &str) -> Option<AuthorInfo> {
    let hit = search_response
        .get("hits")
        .map(|hits| array(hits, "hits"))
        .and_then(|hits| hits.first())?;
    let meta = metadata_of(hit);

    let bai = array(meta, "ids")
        .iter()
        .find(|id| id.get("schema").and_then(Value::as_str) == Some(BAI_SCHEMA))
        .and_then(|id| opt_text(id, "value"))?;

    let name = meta.get("name").unwrap_or(&NULL);
    Some(AuthorInfo {
        name: Some(opt_text(name, "value").unwrap_or_else(|| queried_name.to_string())),
        preferred_name: Some(opt_text(name, "preferred_name").unwrap_or_default()),
        bai: Some(bai),
        inspire_author_id: Some(text(hit, "id")),
    })
}

/// Total hit count and records of a literature search response.
pub fn search_hits(response: &Value) -> (u64, &[Value]) {
    let hits = response.get("hits").unwrap_or(&NULL);
    let total = hits.get("total").and_then(Value::as_u64).unwrap_or(0);
    (total, array(hits, "hits"))
}
