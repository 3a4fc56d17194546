//! Research tools: recent web search, similar articles, and article contents.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::research::ResearchClient;

/// Search the web (last 7 days) and return brief content summaries.
pub struct SearchAndContents {
    client: Arc<ResearchClient>,
}

impl SearchAndContents {
    pub fn new(client: Arc<ResearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchAndContents {
    fn name(&self) -> &str {
        "search_and_contents"
    }

    fn description(&self) -> &str {
        "Search the web (last 7 days) and return brief content summaries as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "search_query": {
                    "type": "string",
                    "description": "Query string to search recent web content"
                }
            },
            "required": ["search_query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["search_query"]
            .as_str()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing 'search_query' argument"))?;

        let results = self.client.search(query).await?;
        Ok(serde_json::to_string(&results)?)
    }
}

/// Find articles similar to a given URL.
pub struct FindSimilar {
    client: Arc<ResearchClient>,
}

impl FindSimilar {
    pub fn new(client: Arc<ResearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FindSimilar {
    fn name(&self) -> &str {
        "find_similar"
    }

    fn description(&self) -> &str {
        "Find similar articles to a given article URL; returns JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "article_url": {
                    "type": "string",
                    "description": "URL of the article to find similar content for"
                }
            },
            "required": ["article_url"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let article_url = args["article_url"]
            .as_str()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing 'article_url' argument"))?;
        url::Url::parse(article_url)
            .map_err(|e| anyhow::anyhow!("Invalid 'article_url': {}", e))?;

        let results = self.client.find_similar(article_url).await?;
        Ok(serde_json::to_string(&results)?)
    }
}

/// Get contents of specific articles by ID or URL.
pub struct GetContents {
    client: Arc<ResearchClient>,
}

impl GetContents {
    pub fn new(client: Arc<ResearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetContents {
    fn name(&self) -> &str {
        "get_contents"
    }

    fn description(&self) -> &str {
        "Get contents of specific articles. Input: list of IDs/URLs; returns JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "article_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "List of article IDs or URLs to fetch contents for"
                }
            },
            "required": ["article_ids"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        // Agents sometimes pass a single id as a bare string.
        let ids: Vec<String> = match &args["article_ids"] {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            Value::String(single) => vec![single.clone()],
            _ => anyhow::bail!("Missing 'article_ids' argument"),
        };
        if ids.is_empty() {
            anyhow::bail!("'article_ids' must contain at least one id");
        }

        let contents = self.client.get_contents(&ids).await?;
        Ok(serde_json::to_string(&contents)?)
    }
}
