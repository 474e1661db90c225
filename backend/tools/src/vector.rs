//! Pinecone vector search client.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const MAX_TOP_K: usize = 20;

/// Input for the vector_search tool.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorSearchInput {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub filter: Option<Value>,
}

fn default_top_k() -> usize {
    5
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dimension: Option<u32>,
    #[serde(default)]
    host: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    namespace: &'a str,
    query: QueryBody,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct QueryBody {
    inputs: Value,
    top_k: usize,
}

/// Client for one Pinecone index with integrated text inference.
#[derive(Clone)]
pub struct PineconeClient {
    http: Client,
    api_key: String,
    /// Data-plane host of the index (e.g. "https://my-index-abc.svc...").
    index_host: String,
}

impl PineconeClient {
    pub fn new(http: Client, api_key: impl Into<String>, index_host: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            index_host: index_host.into(),
        }
    }

    /// Search the index, returning markdown-formatted matches.
    pub async fn search(&self, input: VectorSearchInput) -> Result<String> {
        let request = QueryRequest {
            namespace: &input.namespace,
            query: QueryBody {
                inputs: json!({"text": input.query}),
                top_k: input.top_k.min(MAX_TOP_K),
            },
            include_metadata: true,
            filter: input.filter.as_ref(),
        };

        let response: SearchResponse = self
            .http
            .post(format!(
                "{}/records/namespaces/{}/search",
                self.index_host.trim_end_matches('/'),
                if input.namespace.is_empty() {
                    "__default__"
                } else {
                    &input.namespace
                }
            ))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.matches.is_empty() {
            return Ok(format!("No matches found for: {}", input.query));
        }

        let mut out = vec![
            format!("## Vector Search: {}\n", input.query),
            format!("*{} matches*\n", response.matches.len()),
        ];
        for (i, m) in response.matches.iter().enumerate() {
            let title = m
                .metadata
                .get("title")
                .or_else(|| m.metadata.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("Untitled");
            let content: String = m
                .metadata
                .get("text")
                .or_else(|| m.metadata.get("content"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .chars()
                .take(400)
                .collect();
            let source = m
                .metadata
                .get("source")
                .or_else(|| m.metadata.get("type"))
                .and_then(|v| v.as_str())
                .unwrap_or("");

            out.push(format!("### {}. {}", i + 1, title));
            out.push(format!("**Score**: {:.3}", m.score));
            if !source.is_empty() {
                out.push(format!("**Source**: {source}"));
            }
            out.push(format!("\n{content}\n"));
            out.push("---".into());
        }
        Ok(out.join("\n"))
    }

    /// List the project's indexes via the control plane.
    pub async fn list_indexes(&self) -> Result<String> {
        let response: IndexList = self
            .http
            .get("https://api.pinecone.io/indexes")
            .header("Api-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut out = vec!["## Pinecone Indexes\n".to_string()];
        for idx in &response.indexes {
            out.push(format!("### {}", idx.name));
            if let Some(dim) = idx.dimension {
                out.push(format!("- **Dimensions**: {dim}"));
            }
            if let Some(host) = &idx.host {
                out.push(format!("- **Host**: {host}"));
            }
            out.push(String::new());
        }
        Ok(out.join("\n"))
    }
}
