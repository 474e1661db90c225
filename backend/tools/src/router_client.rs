//! HTTP client for the external knowledge-graph routing subsystem.
//!
//! The heuristics behind these endpoints (graph walks, problem-language
//! classification) live in that subsystem; this client only defines the
//! wire contract and maps responses into score maps.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use atelier_core::{AgentId, AtelierError, KnowledgeRouter, ScoreMap};

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
    current_agent_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    #[serde(default)]
    scores: ScoreMap,
    #[serde(default)]
    trace: Value,
}

#[derive(Debug, Serialize)]
struct GateRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GateResponse {
    #[serde(default)]
    has_problem_language: bool,
}

#[derive(Debug, Serialize)]
struct EnrichRequest<'a> {
    text: &'a str,
    turn_count: usize,
    agent_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    hint: Option<String>,
}

/// [`KnowledgeRouter`] implementation over HTTP.
#[derive(Clone)]
pub struct HttpKnowledgeRouter {
    http: Client,
    base_url: String,
}

impl HttpKnowledgeRouter {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn score_call(
        &self,
        path: &str,
        text: &str,
        current: &AgentId,
    ) -> Result<(ScoreMap, Value)> {
        let response: ScoreResponse = self
            .http
            .post(self.endpoint(path))
            .json(&ScoreRequest {
                text,
                current_agent_id: current.as_str(),
            })
            .send()
            .await
            .map_err(|e| AtelierError::RouterUnavailable(e.to_string()))?
            .error_for_status()?
            .json()
            .await?;
        Ok((response.scores, response.trace))
    }
}

#[async_trait]
impl KnowledgeRouter for HttpKnowledgeRouter {
    async fn graph_score_agents(&self, text: &str, current: &AgentId) -> Result<(ScoreMap, Value)> {
        self.score_call("/route/score", text, current).await
    }

    async fn has_problem_language(&self, text: &str) -> Result<bool> {
        let response: GateResponse = self
            .http
            .post(self.endpoint("/route/problem-language"))
            .json(&GateRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.has_problem_language)
    }

    async fn classify_and_route(&self, text: &str, current: &AgentId) -> Result<(ScoreMap, Value)> {
        self.score_call("/route/classify", text, current).await
    }

    async fn enrich_for_agent(
        &self,
        text: &str,
        turn_count: usize,
        agent: &AgentId,
    ) -> Result<Option<String>> {
        let response: EnrichResponse = self
            .http
            .post(self.endpoint("/route/enrich"))
            .json(&EnrichRequest {
                text,
                turn_count,
                agent_id: agent.as_str(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.hint.filter(|h| !h.is_empty()))
    }
}

/// Router used when no knowledge-graph subsystem is configured: every
/// contribution is empty and the gate is always off.
#[derive(Debug, Clone, Default)]
pub struct NullKnowledgeRouter;

#[async_trait]
impl KnowledgeRouter for NullKnowledgeRouter {
    async fn graph_score_agents(
        &self,
        _text: &str,
        _current: &AgentId,
    ) -> Result<(ScoreMap, Value)> {
        Ok((ScoreMap::new(), Value::Null))
    }

    async fn has_problem_language(&self, _text: &str) -> Result<bool> {
        Ok(false)
    }

    async fn classify_and_route(
        &self,
        _text: &str,
        _current: &AgentId,
    ) -> Result<(ScoreMap, Value)> {
        Ok((ScoreMap::new(), Value::Null))
    }

    async fn enrich_for_agent(
        &self,
        _text: &str,
        _turn_count: usize,
        _agent: &AgentId,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let router = HttpKnowledgeRouter::new(Client::new(), "http://graph:8080/");
        assert_eq!(router.endpoint("/route/score"), "http://graph:8080/route/score");
    }

    #[tokio::test]
    async fn null_router_is_inert() {
        let router = NullKnowledgeRouter;
        let (scores, trace) = router
            .graph_score_agents("text", &AgentId::from("larry"))
            .await
            .unwrap();
        assert!(scores.is_empty());
        assert_eq!(trace, Value::Null);
        assert!(!router.has_problem_language("a problem!").await.unwrap());
        assert!(router
            .enrich_for_agent("text", 3, &AgentId::from("tta"))
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn score_response_tolerates_missing_fields() {
        let r: ScoreResponse = serde_json::from_str("{}").unwrap();
        assert!(r.scores.is_empty());
        assert_eq!(r.trace, Value::Null);
    }
}
