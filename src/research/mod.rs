//! Research client for newsletter generation.
//!
//! This module provides a trait-based abstraction over web-search providers,
//! with Exa as the primary implementation, plus the resilient client that
//! applies retry and pacing uniformly to every provider call.

mod client;
mod clock;
mod error;
mod exa;
mod provider;
mod retry;
mod types;

pub use client::ResearchClient;
pub use clock::{Clock, SystemClock};
pub use error::{classify_http_status, ProviderError, ProviderErrorKind};
pub use exa::ExaProvider;
pub use provider::SearchProvider;
pub use retry::{RetryPolicy, RetryPredicate};
pub use types::{
    recency_cutoff, truncate_excerpt, ContentFetchRequest, ContentMap, ExcerptOptions, ResultSet,
    SearchHit, SearchRequest, SimilarityQuery, EXCERPT_MAX_CHARS, RECENCY_WINDOW_DAYS,
    SEARCH_RESULT_CAP,
};

#[cfg(test)]
pub(crate) use clock::testing::RecordingClock;
#[cfg(test)]
pub(crate) use provider::testing::ScriptedProvider;
