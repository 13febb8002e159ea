//! Fetch stage: query the arXiv Atom API and parse entries into paper records.
//!
//! ## Why the Atom API?
//!
//! arXiv's query endpoint (`/api/query`) is the only supported programmatic
//! search surface; it returns an Atom 1.0 feed with arXiv-specific extension
//! elements. We deserialize the handful of elements the pipeline needs with
//! quick-xml's serde support and ignore the rest (categories, affiliations,
//! opensearch counters).
//!
//! A feed with zero entries is a valid result, not an error: the digest for
//! a query nothing matches is simply empty.

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::output::PaperRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

// ── Atom feed shape ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    /// Canonical abstract-page URL, e.g. `http://arxiv.org/abs/2301.00001v1`.
    id: String,
    title: String,
    summary: String,
    published: DateTime<Utc>,
    #[serde(rename = "link", default)]
    links: Vec<FeedLink>,
}

#[derive(Debug, Deserialize)]
struct FeedLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title")]
    title: Option<String>,
    #[serde(rename = "@type")]
    link_type: Option<String>,
}

// ── Query ────────────────────────────────────────────────────────────────

/// Query parameters for one search request.
///
/// The `all:` prefix searches every metadata field; relevance ordering
/// matches what the arXiv website shows for the same query.
fn search_params(query: &str, max_results: usize) -> [(&'static str, String); 5] {
    [
        ("search_query", format!("all:{}", query)),
        ("start", "0".to_string()),
        ("max_results", max_results.to_string()),
        ("sortBy", "relevance".to_string()),
        ("sortOrder", "descending".to_string()),
    ]
}

/// Fetch up to `config.max_results` papers matching `config.query`.
///
/// # Errors
/// HTTP failures and unparseable feeds are fatal ([`DigestError::SearchFailed`]
/// / [`DigestError::FeedParse`]); an empty feed is `Ok(vec![])`.
pub async fn fetch_papers(config: &DigestConfig) -> Result<Vec<PaperRecord>, DigestError> {
    info!(
        "Querying arXiv for '{}' (max {} results)",
        config.query, config.max_results
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .user_agent(concat!("arxiv-digest/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DigestError::SearchFailed {
            query: config.query.clone(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(&config.arxiv_base_url)
        .query(&search_params(&config.query, config.max_results))
        .send()
        .await
        .map_err(|e| DigestError::SearchFailed {
            query: config.query.clone(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(DigestError::SearchFailed {
            query: config.query.clone(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let body = response.text().await.map_err(|e| DigestError::SearchFailed {
        query: config.query.clone(),
        reason: e.to_string(),
    })?;

    let papers = parse_feed(&body)?;
    info!("arXiv returned {} entries", papers.len());
    Ok(papers)
}

/// Parse an Atom feed body into paper records, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>, DigestError> {
    let feed: Feed = quick_xml::de::from_str(xml).map_err(|e| DigestError::FeedParse {
        detail: e.to_string(),
    })?;

    feed.entries.into_iter().map(entry_to_record).collect()
}

fn entry_to_record(entry: FeedEntry) -> Result<PaperRecord, DigestError> {
    let paper_id = entry
        .id
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DigestError::MalformedEntry {
            entry_id: entry.id.clone(),
            detail: "entry id has no trailing path segment".to_string(),
        })?
        .to_string();

    let pdf_url = select_pdf_url(&entry);
    debug!("Entry {}: pdf link {}", paper_id, pdf_url);

    Ok(PaperRecord {
        paper_id,
        entry_url: entry.id,
        title: normalize_whitespace(&entry.title),
        abstract_text: normalize_whitespace(&entry.summary),
        published: entry.published,
        pdf_url,
        markdown: String::new(),
    })
}

/// Pick the entry's PDF link: the `<link>` titled `pdf` or typed
/// `application/pdf`, falling back to rewriting the abstract URL.
fn select_pdf_url(entry: &FeedEntry) -> String {
    entry
        .links
        .iter()
        .find(|l| {
            l.title.as_deref() == Some("pdf") || l.link_type.as_deref() == Some("application/pdf")
        })
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry.id.replace("/abs/", "/pdf/"))
}

/// Collapse runs of whitespace (arXiv wraps titles and abstracts with
/// newline + indent) into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
