//! Tool system for the orchestration layer.
//!
//! Research operations are exposed as named tools with a JSON schema for
//! their arguments. Each tool returns its result serialized as a JSON string,
//! which is what agent frameworks hand back to the model as an observation.

mod research;

pub use research::{FindSimilar, GetContents, SearchAndContents};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::research::ResearchClient;

/// Information about a tool for display purposes.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Function-calling tool definition as consumed by LLM APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

/// Function part of a [`ToolDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Trait for implementing tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry (no built-in tools).
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the three research tools sharing one client.
    pub fn research(client: Arc<ResearchClient>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(SearchAndContents::new(Arc::clone(&client))));
        registry.register(Arc::new(FindSimilar::new(Arc::clone(&client))));
        registry.register(Arc::new(GetContents::new(client)));

        tracing::debug!("Research registry complete with {} tools", registry.tools.len());
        registry
    }

    /// Add or replace a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// List all available tools, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let mut infos: Vec<ToolInfo> = self
            .tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Check if a tool exists by name.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool schemas in LLM-compatible format.
    pub fn get_tool_schemas(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResearchConfig;
    use crate::research::ScriptedProvider;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let mut config = ResearchConfig::new("test-key").unwrap();
        config.pacing_delay = std::time::Duration::ZERO;
        let client = ResearchClient::new(Arc::new(ScriptedProvider::succeeding()), &config);
        ToolRegistry::research(Arc::new(client))
    }

    #[test]
    fn test_research_registry_lists_three_tools() {
        let names: Vec<String> = registry().list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["find_similar", "get_contents", "search_and_contents"]);
    }

    #[test]
    fn test_has_tool() {
        let registry = registry();
        assert!(registry.has_tool("find_similar"));
        assert!(!registry.has_tool("web_search"));
        assert!(!ToolRegistry::empty().has_tool("find_similar"));
    }

    #[test]
    fn test_schemas_are_function_definitions() {
        let schemas = registry().get_tool_schemas();
        assert_eq!(schemas.len(), 3);
        for def in schemas {
            assert_eq!(def.tool_type, "function");
            assert_eq!(def.function.parameters["type"], "object");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let err = registry().execute("nope", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let out = registry()
            .execute("search_and_contents", json!({ "search_query": "ai chips" }))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert!(value["results"].is_array());
    }
}
