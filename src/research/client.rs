//! Resilient research client.
//!
//! Wraps a [`SearchProvider`] with a uniform [`RetryPolicy`] and a fixed
//! post-call pacing pause. The client keeps no state between calls, so one
//! instance can be shared across tasks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::error::ProviderError;
use super::exa::ExaProvider;
use super::provider::SearchProvider;
use super::retry::RetryPolicy;
use super::types::{
    truncate_excerpt, ContentFetchRequest, ContentMap, ResultSet, SearchRequest, SimilarityQuery,
    EXCERPT_MAX_CHARS, SEARCH_RESULT_CAP,
};
use crate::config::ResearchConfig;

/// Search client with retry and rate-limit pacing.
pub struct ResearchClient {
    provider: Arc<dyn SearchProvider>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    pacing_delay: Duration,
}

impl ResearchClient {
    /// Build a client talking to Exa with the given configuration.
    pub fn from_config(config: &ResearchConfig) -> Result<Self, ProviderError> {
        let provider = ExaProvider::new(config)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Build a client around an arbitrary provider.
    pub fn new(provider: Arc<dyn SearchProvider>, config: &ResearchConfig) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            retry: config.retry.clone(),
            pacing_delay: config.pacing_delay,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current time according to the client's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Search recent content (last 7 days), at most 2 results with 300-char excerpts.
    pub async fn search(&self, query: &str) -> Result<ResultSet, ProviderError> {
        let request = SearchRequest::new(query, self.clock.now());
        tracing::debug!(
            "search query={:?} since={} num_results={}",
            request.query,
            request.start_published_date,
            request.num_results
        );

        let mut set = self
            .retry
            .run(self.clock.as_ref(), "search", |_| self.provider.search(&request))
            .await?;
        set.results.truncate(SEARCH_RESULT_CAP as usize);
        clamp_excerpts(&mut set);

        self.pace().await;
        Ok(set)
    }

    /// Find content similar to `url`, published within the last 7 days.
    pub async fn find_similar(&self, url: &str) -> Result<ResultSet, ProviderError> {
        let query = SimilarityQuery::new(url, self.clock.now());
        tracing::debug!("find_similar url={} since={}", query.url, query.start_published_date);

        let mut set = self
            .retry
            .run(self.clock.as_ref(), "find_similar", |_| {
                self.provider.find_similar(&query)
            })
            .await?;
        clamp_excerpts(&mut set);

        self.pace().await;
        Ok(set)
    }

    /// Fetch excerpts for the given identifiers.
    pub async fn get_contents(&self, ids: &[String]) -> Result<ContentMap, ProviderError> {
        if ids.is_empty() {
            return Err(ProviderError::invalid_request(
                "get_contents requires at least one id",
            ));
        }
        let request = ContentFetchRequest::new(ids.to_vec());
        tracing::debug!("get_contents ids={}", request.ids.len());

        let mut contents = self
            .retry
            .run(self.clock.as_ref(), "get_contents", |_| {
                self.provider.get_contents(&request)
            })
            .await?;
        for text in contents.values_mut() {
            *text = truncate_excerpt(text, EXCERPT_MAX_CHARS);
        }

        self.pace().await;
        Ok(contents)
    }

    async fn pace(&self) {
        if !self.pacing_delay.is_zero() {
            self.clock.sleep(self.pacing_delay).await;
        }
    }
}

fn clamp_excerpts(set: &mut ResultSet) {
    for hit in &mut set.results {
        hit.text = truncate_excerpt(&hit.text, EXCERPT_MAX_CHARS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::clock::testing::RecordingClock;
    use crate::research::error::ProviderErrorKind;
    use crate::research::provider::testing::ScriptedProvider;
    use crate::research::types::SearchHit;
    use chrono::TimeZone;

    const PACE: Duration = Duration::from_secs(1);

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn client_with(
        provider: Arc<ScriptedProvider>,
    ) -> (ResearchClient, Arc<RecordingClock>) {
        let clock = Arc::new(RecordingClock::at(fixed_now()));
        let config = ResearchConfig::new("test-key").unwrap();
        let client = ResearchClient::new(provider, &config).with_clock(clock.clone());
        (client, clock)
    }

    fn two_transient() -> Vec<ProviderError> {
        vec![
            ProviderError::rate_limited("429"),
            ProviderError::rate_limited("429"),
        ]
    }

    fn three_transient() -> Vec<ProviderError> {
        vec![
            ProviderError::rate_limited("429"),
            ProviderError::payload_too_large("413"),
            ProviderError::rate_limited("429"),
        ]
    }

    #[tokio::test]
    async fn test_search_caps_results_and_excerpts() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let (client, _) = client_with(provider.clone());

        let set = client.search("quantum computing").await.unwrap();

        let searches = provider.searches.lock().unwrap();
        assert_eq!(searches.len(), 1);
        assert!(searches[0].num_results <= 2);
        assert!(searches[0].excerpt.max_characters <= 300);
        assert!(!searches[0].excerpt.include_html_tags);
        assert!(set.results.iter().all(|h| h.text.chars().count() <= 300));
    }

    #[tokio::test]
    async fn test_cutoff_is_now_minus_seven_days() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let (client, _) = client_with(provider.clone());

        client.search("q").await.unwrap();
        client.find_similar("https://example.com/a").await.unwrap();

        assert_eq!(provider.searches.lock().unwrap()[0].start_published_date, "2024-02-27");
        assert_eq!(provider.similar.lock().unwrap()[0].start_published_date, "2024-02-27");
    }

    #[tokio::test]
    async fn test_two_transient_failures_then_success() {
        for op in ["search", "find_similar", "get_contents"] {
            let provider = Arc::new(ScriptedProvider::failing_with(two_transient()));
            let (client, clock) = client_with(provider.clone());

            let ok = match op {
                "search" => client.search("q").await.is_ok(),
                "find_similar" => client.find_similar("https://e.com").await.is_ok(),
                _ => client.get_contents(&["a".to_string()]).await.is_ok(),
            };

            assert!(ok, "{op} should succeed on the third attempt");
            assert_eq!(provider.calls(), 3, "{op}");
            assert_eq!(
                clock.sleeps(),
                vec![Duration::from_secs(1), Duration::from_secs(2), PACE],
                "{op}"
            );
        }
    }

    #[tokio::test]
    async fn test_three_transient_failures_exhaust_budget() {
        for op in ["search", "find_similar", "get_contents"] {
            let provider = Arc::new(ScriptedProvider::failing_with(three_transient()));
            let (client, clock) = client_with(provider.clone());

            let err = match op {
                "search" => client.search("q").await.unwrap_err(),
                "find_similar" => client.find_similar("https://e.com").await.unwrap_err(),
                _ => client.get_contents(&["a".to_string()]).await.unwrap_err(),
            };

            assert!(err.is_transient(), "{op}");
            assert_eq!(err.kind, ProviderErrorKind::RateLimited, "{op}");
            assert_eq!(provider.calls(), 3, "{op}");
            // Backoff only, no pacing after failure.
            assert_eq!(
                clock.sleeps(),
                vec![Duration::from_secs(1), Duration::from_secs(2)],
                "{op}"
            );
        }
    }

    #[tokio::test]
    async fn test_non_transient_failure_is_immediate() {
        for op in ["search", "find_similar", "get_contents"] {
            let provider = Arc::new(ScriptedProvider::failing_with(vec![
                ProviderError::client_error(400, "malformed request"),
            ]));
            let (client, clock) = client_with(provider.clone());

            let err = match op {
                "search" => client.search("q").await.unwrap_err(),
                "find_similar" => client.find_similar("https://e.com").await.unwrap_err(),
                _ => client.get_contents(&["a".to_string()]).await.unwrap_err(),
            };

            assert_eq!(err.kind, ProviderErrorKind::ClientError, "{op}");
            assert_eq!(provider.calls(), 1, "{op}");
            assert!(clock.sleeps().is_empty(), "{op}");
        }
    }

    #[tokio::test]
    async fn test_exactly_one_pacing_pause_per_success() {
        for failures in [0usize, 1, 2] {
            let script = vec![ProviderError::rate_limited("429"); failures];
            let provider = Arc::new(ScriptedProvider::failing_with(script));
            let (client, clock) = client_with(provider);

            client.search("q").await.unwrap();

            let sleeps = clock.sleeps();
            assert_eq!(sleeps.len(), failures + 1);
            assert_eq!(sleeps.last(), Some(&PACE));
        }
    }

    #[tokio::test]
    async fn test_get_contents_rejects_empty_ids() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let (client, clock) = client_with(provider.clone());

        let err = client.get_contents(&[]).await.unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
        assert_eq!(provider.calls(), 0);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_get_contents_truncates_excerpts() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let (client, _) = client_with(provider);

        let ids = vec!["https://a.example".to_string(), "b".to_string()];
        let contents = client.get_contents(&ids).await.unwrap();

        assert_eq!(contents.len(), 2);
        assert!(contents.values().all(|t| t.chars().count() <= 300));
    }

    #[tokio::test]
    async fn test_search_truncates_oversized_response() {
        let mut provider = ScriptedProvider::succeeding();
        let hit = provider.hits[0].clone();
        provider.hits = (1..=3)
            .map(|i| SearchHit {
                url: format!("https://news.example.com/{i}"),
                ..hit.clone()
            })
            .collect();
        let (client, _) = client_with(Arc::new(provider));

        let set = client.search("q").await.unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.results[1].url, "https://news.example.com/2");
    }

    #[tokio::test]
    async fn test_no_retry_policy_makes_one_attempt() {
        let provider = Arc::new(ScriptedProvider::failing_with(two_transient()));
        let (client, clock) = client_with(provider.clone());
        let client = client.with_retry_policy(RetryPolicy::no_retry());

        let err = client.search("q").await.unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::RateLimited);
        assert_eq!(provider.calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_provider_name_and_clock_are_exposed() {
        let (client, _) = client_with(Arc::new(ScriptedProvider::succeeding()));
        assert_eq!(client.provider_name(), "scripted");
        assert_eq!(client.now(), fixed_now());
    }
}
