//! Exa API provider.
//!
//! Speaks Exa's JSON endpoints (`/search`, `/findSimilar`, `/contents`) and
//! maps every failure onto a classified [`ProviderError`]. One request per
//! method call; no retry here.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::provider::SearchProvider;
use super::types::{
    truncate_excerpt, ContentFetchRequest, ContentMap, ExcerptOptions, ResultSet, SearchHit,
    SearchRequest, SimilarityQuery,
};
use crate::config::ResearchConfig;

/// Exa search provider over HTTP.
pub struct ExaProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchBody<'a> {
    query: &'a str,
    use_autoprompt: bool,
    num_results: u32,
    start_published_date: &'a str,
    contents: ExaContentsOptions,
}

#[derive(Debug, Serialize)]
struct ExaContentsOptions {
    text: ExcerptOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaFindSimilarBody<'a> {
    url: &'a str,
    start_published_date: &'a str,
}

#[derive(Debug, Serialize)]
struct ExaContentsBody<'a> {
    ids: &'a [String],
    text: ExaTextLimit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaTextLimit {
    max_characters: usize,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    #[serde(default)]
    id: Option<String>,
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ExaResult {
    fn into_hit(self, max_chars: usize) -> SearchHit {
        SearchHit {
            id: self.id.unwrap_or_else(|| self.url.clone()),
            url: self.url,
            title: self.title,
            published_date: self.published_date,
            author: self.author,
            text: truncate_excerpt(self.text.as_deref().unwrap_or_default(), max_chars),
        }
    }
}

impl ExaProvider {
    /// Create a provider from the research configuration.
    pub fn new(config: &ResearchConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("newsletter-research/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::network_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST a JSON body to `path` and decode the response.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = match self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(ProviderError::network_error(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(ProviderError::network_error(format!("Connection failed: {}", e)));
                } else {
                    return Err(ProviderError::network_error(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::debug!("Exa {} returned {}", path, status);
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            ProviderError::parse_error(format!("Failed to parse {} response: {}", path, e))
        })
    }
}

#[async_trait]
impl SearchProvider for ExaProvider {
    fn name(&self) -> &str {
        "exa"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ResultSet, ProviderError> {
        let body = ExaSearchBody {
            query: &request.query,
            use_autoprompt: request.use_autoprompt,
            num_results: request.num_results,
            start_published_date: &request.start_published_date,
            contents: ExaContentsOptions {
                text: request.excerpt,
            },
        };
        let response: ExaResponse = self.post("/search", &body).await?;
        let max_chars = request.excerpt.max_characters;

        Ok(ResultSet {
            results: response
                .results
                .into_iter()
                .map(|r| r.into_hit(max_chars))
                .collect(),
        })
    }

    async fn find_similar(&self, query: &SimilarityQuery) -> Result<ResultSet, ProviderError> {
        let body = ExaFindSimilarBody {
            url: &query.url,
            start_published_date: &query.start_published_date,
        };
        let response: ExaResponse = self.post("/findSimilar", &body).await?;

        Ok(ResultSet {
            results: response
                .results
                .into_iter()
                .map(|r| r.into_hit(ExcerptOptions::default().max_characters))
                .collect(),
        })
    }

    async fn get_contents(
        &self,
        request: &ContentFetchRequest,
    ) -> Result<ContentMap, ProviderError> {
        let body = ExaContentsBody {
            ids: &request.ids,
            text: ExaTextLimit {
                max_characters: request.excerpt.max_characters,
            },
        };
        let response: ExaResponse = self.post("/contents", &body).await?;
        let max_chars = request.excerpt.max_characters;

        // Key by what the caller asked for. Exa may answer a URL with its own
        // document id, in which case the url (or the request position) matches.
        let requested: HashSet<&str> = request.ids.iter().map(String::as_str).collect();
        Ok(response
            .results
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let hit = r.into_hit(max_chars);
                let key = if requested.contains(hit.id.as_str()) {
                    hit.id
                } else if requested.contains(hit.url.as_str()) {
                    hit.url
                } else {
                    request.ids.get(i).cloned().unwrap_or(hit.id)
                };
                (key, hit.text)
            })
            .collect())
    }
}
