//! Request and result types for the research client.
//!
//! Requests are built once per call and never mutated. Results are
//! normalized into plain serde structs so they serialize to string-keyed
//! JSON for whatever consumes them downstream.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// Lookback window applied to `search` and `find_similar`.
pub const RECENCY_WINDOW_DAYS: i64 = 7;

/// Maximum number of results requested by `search`.
pub const SEARCH_RESULT_CAP: u32 = 2;

/// Hard cap on excerpt length, in characters.
pub const EXCERPT_MAX_CHARS: usize = 300;

/// Excerpt options sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptOptions {
    pub max_characters: usize,
    pub include_html_tags: bool,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        Self {
            max_characters: EXCERPT_MAX_CHARS,
            include_html_tags: false,
        }
    }
}

/// Published-date cutoff (`YYYY-MM-DD`) for the recency window ending at `now`.
pub fn recency_cutoff(now: DateTime<Utc>) -> String {
    (now - ChronoDuration::days(RECENCY_WINDOW_DAYS))
        .format("%Y-%m-%d")
        .to_string()
}

/// Keyword search with content excerpts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub start_published_date: String,
    pub num_results: u32,
    pub use_autoprompt: bool,
    pub excerpt: ExcerptOptions,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            query: query.into(),
            start_published_date: recency_cutoff(now),
            num_results: SEARCH_RESULT_CAP,
            use_autoprompt: true,
            excerpt: ExcerptOptions::default(),
        }
    }
}

/// Similar-content discovery from a seed URL. No result cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityQuery {
    pub url: String,
    pub start_published_date: String,
}

impl SimilarityQuery {
    pub fn new(url: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            start_published_date: recency_cutoff(now),
        }
    }
}

/// Bulk content retrieval by identifier. No recency constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFetchRequest {
    pub ids: Vec<String>,
    pub excerpt: ExcerptOptions,
}

impl ContentFetchRequest {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            excerpt: ExcerptOptions::default(),
        }
    }
}

/// One normalized search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Provider identifier (usually the URL itself)
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Excerpt, at most [`EXCERPT_MAX_CHARS`] characters
    #[serde(default)]
    pub text: String,
}

/// Ordered search results, fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub results: Vec<SearchHit>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Mapping from requested identifier to excerpt.
pub type ContentMap = BTreeMap<String, String>;

/// Truncate `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
