//! `Tool` bindings exposing the service clients to personas.
//!
//! Errors are converted to plain strings at this seam: a failing tool
//! reports its problem back to the model instead of failing the turn.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use atelier_core::Tool;

use crate::graph::Neo4jClient;
use crate::tavily::{SearchInput, TavilyClient};
use crate::vector::{PineconeClient, VectorSearchInput};

/// Named tool lookup used to resolve a persona's `tool_ids`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Resolve a persona's bindings, warning about unknown names.
    pub fn resolve(&self, tool_ids: &[String]) -> Vec<Arc<dyn Tool>> {
        tool_ids
            .iter()
            .filter_map(|id| {
                let tool = self.tools.get(id).cloned();
                if tool.is_none() {
                    warn!(tool = %id, "persona references unknown tool");
                }
                tool
            })
            .collect()
    }
}

fn err_string(err: anyhow::Error) -> String {
    format!("Error: {err:#}")
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

// ---------------------------------------------------------------------------
// Tavily
// ---------------------------------------------------------------------------

pub struct TavilySearchTool(pub TavilyClient);

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        "tavily_search"
    }

    fn description(&self) -> &str {
        "Search the web for real-time information: news, research, market and competitor data."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "search_depth": {"type": "string", "enum": ["basic", "advanced"]},
                "max_results": {"type": "integer", "minimum": 1, "maximum": 20},
                "include_domains": {"type": "array", "items": {"type": "string"}},
                "exclude_domains": {"type": "array", "items": {"type": "string"}},
                "topic": {"type": "string", "enum": ["general", "news"]}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let input: SearchInput = match serde_json::from_value(args) {
            Ok(input) => input,
            Err(e) => return Ok(format!("Error: invalid arguments: {e}")),
        };
        Ok(self.0.search(input).await.unwrap_or_else(err_string))
    }
}

pub struct TavilyExtractTool(pub TavilyClient);

#[async_trait]
impl Tool for TavilyExtractTool {
    fn name(&self) -> &str {
        "tavily_extract"
    }

    fn description(&self) -> &str {
        "Extract and clean the content of a single web page by URL."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"url": {"type": "string"}},
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let Some(url) = str_arg(&args, "url") else {
            return Ok("Error: 'url' argument is required".into());
        };
        Ok(self.0.extract(url).await.unwrap_or_else(err_string))
    }
}

// ---------------------------------------------------------------------------
// Neo4j
// ---------------------------------------------------------------------------

pub struct GraphQueryTool(pub Neo4jClient);

#[async_trait]
impl Tool for GraphQueryTool {
    fn name(&self) -> &str {
        "graph_query"
    }

    fn description(&self) -> &str {
        "Run a read-only Cypher query against the knowledge graph. Write operations are rejected."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cypher": {"type": "string"},
                "params": {"type": "object"}
            },
            "required": ["cypher"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let Some(cypher) = str_arg(&args, "cypher") else {
            return Ok("Error: 'cypher' argument is required".into());
        };
        let params = args.get("params").cloned().unwrap_or_else(|| json!({}));
        Ok(self.0.query(cypher, params).await.unwrap_or_else(err_string))
    }
}

pub struct GraphSchemaTool(pub Neo4jClient);

#[async_trait]
impl Tool for GraphSchemaTool {
    fn name(&self) -> &str {
        "graph_schema"
    }

    fn description(&self) -> &str {
        "Describe the knowledge graph: node labels, counts, relationship types."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<String> {
        Ok(self.0.schema().await.unwrap_or_else(err_string))
    }
}

pub struct SaveInsightTool(pub Neo4jClient);

#[async_trait]
impl Tool for SaveInsightTool {
    fn name(&self) -> &str {
        "save_insight"
    }

    fn description(&self) -> &str {
        "Persist a discovered insight (finding, opportunity, framework application) to the knowledge graph."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "insight_type": {"type": "string"},
                "source": {"type": "string"},
                "tags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["title", "content"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let (Some(title), Some(content)) = (str_arg(&args, "title"), str_arg(&args, "content"))
        else {
            return Ok("Error: 'title' and 'content' arguments are required".into());
        };
        let kind = str_arg(&args, "insight_type").unwrap_or("general");
        let source = str_arg(&args, "source").unwrap_or("atelier");
        let tags: Vec<String> = args
            .get("tags")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(self
            .0
            .save_insight(title, content, kind, source, &tags)
            .await
            .unwrap_or_else(err_string))
    }
}

// ---------------------------------------------------------------------------
// Pinecone
// ---------------------------------------------------------------------------

pub struct VectorSearchTool(pub PineconeClient);

#[async_trait]
impl Tool for VectorSearchTool {
    fn name(&self) -> &str {
        "vector_search"
    }

    fn description(&self) -> &str {
        "Semantic search over the course knowledge base (frameworks, examples, case studies)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "top_k": {"type": "integer", "minimum": 1, "maximum": 20},
                "namespace": {"type": "string"},
                "filter": {"type": "object"}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let input: VectorSearchInput = match serde_json::from_value(args) {
            Ok(input) => input,
            Err(e) => return Ok(format!("Error: invalid arguments: {e}")),
        };
        Ok(self.0.search(input).await.unwrap_or_else(err_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "echoes"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn execute(&self, args: Value) -> Result<String> {
            Ok(args.to_string())
        }
    }

    #[test]
    fn registry_resolves_known_and_skips_unknown() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let resolved = registry.resolve(&["echo".into(), "missing".into()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "echo");
    }

    #[test]
    fn registry_names_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn missing_arguments_become_error_strings() {
        let client = TavilyClient::new(reqwest::Client::new(), "key");
        let tool = TavilyExtractTool(client);
        let out = tool.execute(json!({})).await.unwrap();
        assert!(out.starts_with("Error:"));
    }
}
