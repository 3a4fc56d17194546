//! Search provider abstraction.
//!
//! A provider performs exactly one remote call per method and reports
//! failures as classified [`ProviderError`]s. Retry and pacing are layered on
//! top by [`ResearchClient`](super::ResearchClient), so the same policy
//! applies to the HTTP provider and to test doubles.

use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{ContentFetchRequest, ContentMap, ResultSet, SearchRequest, SimilarityQuery};

/// Low-level access to an external search/content API.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for diagnostics.
    fn name(&self) -> &str;

    /// Keyword search with content excerpts.
    async fn search(&self, request: &SearchRequest) -> Result<ResultSet, ProviderError>;

    /// Documents similar to a seed URL.
    async fn find_similar(&self, query: &SimilarityQuery) -> Result<ResultSet, ProviderError>;

    /// Excerpts for a set of identifiers.
    async fn get_contents(
        &self,
        request: &ContentFetchRequest,
    ) -> Result<ContentMap, ProviderError>;
}
