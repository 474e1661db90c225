//! Tavily web search and URL extraction.

use anyhow::{bail, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TAVILY_API: &str = "https://api.tavily.com";
const MAX_RESULTS_CAP: usize = 20;

/// Search parameters accepted by the tavily_search tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchInput {
    pub query: String,
    /// "basic" (fast) or "advanced" (comprehensive).
    #[serde(default = "default_depth")]
    pub search_depth: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub exclude_domains: Vec<String>,
    /// "general" or "news".
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_depth() -> String {
    "advanced".into()
}

fn default_max_results() -> usize {
    10
}

fn default_topic() -> String {
    "general".into()
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
    topic: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    api_key: &'a str,
    urls: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<ExtractResult>,
}

#[derive(Debug, Deserialize)]
struct ExtractResult {
    #[serde(default)]
    raw_content: String,
}

/// Client for the Tavily search API.
#[derive(Clone)]
pub struct TavilyClient {
    http: Client,
    api_key: String,
}

impl TavilyClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Run a web search, returning markdown-formatted results.
    pub async fn search(&self, input: SearchInput) -> Result<String> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query: &input.query,
            search_depth: &input.search_depth,
            max_results: input.max_results.min(MAX_RESULTS_CAP),
            topic: &input.topic,
            include_domains: input.include_domains,
            exclude_domains: input.exclude_domains,
        };

        let response: SearchResponse = self
            .http
            .post(format!("{TAVILY_API}/search"))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.results.is_empty() {
            return Ok(format!("No results found for: {}", input.query));
        }

        let mut out = vec![
            format!("## Web Search: {}\n", input.query),
            format!("*{} results from Tavily*\n", response.results.len()),
        ];
        for (i, result) in response.results.iter().enumerate() {
            let snippet: String = result.content.chars().take(500).collect();
            out.push(format!("### {}. {}", i + 1, result.title));
            out.push(format!("**URL**: {}", result.url));
            out.push(format!("**Relevance**: {:.2}", result.score));
            out.push(format!("\n{snippet}\n"));
            out.push("---".into());
        }
        Ok(out.join("\n"))
    }

    /// Extract cleaned content from a URL.
    pub async fn extract(&self, url: &str) -> Result<String> {
        let request = ExtractRequest {
            api_key: &self.api_key,
            urls: vec![url],
        };

        let response: ExtractResponse = self
            .http
            .post(format!("{TAVILY_API}/extract"))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(result) = response.results.first() else {
            bail!("could not extract content from: {url}");
        };
        Ok(format!("## Extracted from {url}\n\n{}", result.raw_content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_input_defaults() {
        let input: SearchInput =
            serde_json::from_value(serde_json::json!({"query": "jtbd examples"})).unwrap();
        assert_eq!(input.search_depth, "advanced");
        assert_eq!(input.max_results, 10);
        assert_eq!(input.topic, "general");
        assert!(input.include_domains.is_empty());
    }

    #[test]
    fn max_results_is_capped() {
        let input: SearchInput = serde_json::from_value(
            serde_json::json!({"query": "x", "max_results": 100}),
        )
        .unwrap();
        assert_eq!(input.max_results.min(MAX_RESULTS_CAP), 20);
    }
}
