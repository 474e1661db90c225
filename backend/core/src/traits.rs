use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::chat::ChatMessage;
use crate::types::{AgentId, ScoreMap};

/// Trait for LLM providers that generate the persona's replies.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
}

/// Boundary with the external knowledge-graph subsystem.
///
/// The scoring heuristics behind these calls belong to that subsystem;
/// callers treat every returned map and trace as opaque.
#[async_trait]
pub trait KnowledgeRouter: Send + Sync {
    /// Graph-derived score per agent plus an opaque trace. Always consulted.
    async fn graph_score_agents(
        &self,
        text: &str,
        current: &AgentId,
    ) -> Result<(ScoreMap, Value)>;

    /// Whether the text exhibits problem-statement language.
    async fn has_problem_language(&self, text: &str) -> Result<bool>;

    /// Additional per-agent contribution, only consulted when
    /// [`has_problem_language`](Self::has_problem_language) is true.
    async fn classify_and_route(
        &self,
        text: &str,
        current: &AgentId,
    ) -> Result<(ScoreMap, Value)>;

    /// Optional context hint injected before the active persona's turn.
    async fn enrich_for_agent(
        &self,
        text: &str,
        turn_count: usize,
        agent: &AgentId,
    ) -> Result<Option<String>>;
}

/// A capability a persona can invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g. "tavily_search").
    fn name(&self) -> &str;

    /// Description for the model prompt.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<String>;
}
