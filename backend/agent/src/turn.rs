//! Per-turn orchestration.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use atelier_agents::AgentCatalog;
use atelier_core::{ChatMessage, KnowledgeRouter, LlmProvider, LlmRequest, Suggestion};
use atelier_routing::SuggestionEngine;
use logging::RouteTraceLogger;

use crate::session::SessionState;

/// Reply plus any advisory switch suggestions for one turn.
#[derive(Debug, Clone)]
pub struct TurnOutput {
    pub reply: String,
    pub suggestions: Vec<Suggestion>,
}

/// Runs chat turns against the provider and the advisory scorer.
#[derive(Clone)]
pub struct TurnEngine {
    catalog: Arc<AgentCatalog>,
    provider: Arc<dyn LlmProvider>,
    router: Arc<dyn KnowledgeRouter>,
    suggestions: SuggestionEngine,
    model: String,
}

impl TurnEngine {
    pub fn new(
        catalog: Arc<AgentCatalog>,
        provider: Arc<dyn LlmProvider>,
        router: Arc<dyn KnowledgeRouter>,
        suggestions: SuggestionEngine,
        model: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            provider,
            router,
            suggestions,
            model: model.into(),
        }
    }

    /// Run one turn: provider reply first, then the advisory pass.
    ///
    /// The suggestion pass runs only when the session already has a
    /// completed turn, and its failure never fails the reply.
    pub async fn run_turn(&self, session: &mut SessionState, user_text: &str) -> Result<TurnOutput> {
        let persona = self.catalog.get_or_default(&session.agent_id);
        let prior_turns = session.turn_count();

        // Context enrichment is best-effort and never stored in history.
        let hint = match self
            .router
            .enrich_for_agent(user_text, prior_turns, &session.agent_id)
            .await
        {
            Ok(hint) => hint,
            Err(err) => {
                warn!(error = %err, "context enrichment unavailable");
                None
            }
        };

        let mut messages = session.transcript.clone();
        let provider_text = match (&session.pending_handoff, &hint) {
            (Some(handoff), _) => format!("{handoff}\n\n{user_text}"),
            (None, Some(hint)) => format!("{hint}\n\n{user_text}"),
            (None, None) => user_text.to_string(),
        };
        messages.push(ChatMessage::user(provider_text));

        let response = self
            .provider
            .complete(&LlmRequest {
                model: self.model.clone(),
                system_prompt: persona.system_prompt.clone(),
                messages,
            })
            .await?;

        // Store the original message, not the enriched one.
        session.transcript.push(ChatMessage::user(user_text));
        session.transcript.push(ChatMessage::model(&response.content));
        session.pending_handoff = None;

        let suggestions = if prior_turns >= 1 {
            let outcome = self.suggestions.suggest(user_text, &session.agent_id).await;
            RouteTraceLogger::log(&session.session_id, &outcome.trace);
            outcome
                .suggestions
                .into_iter()
                .filter(|s| {
                    self.catalog
                        .get(&s.agent)
                        .map(|d| d.suggestible)
                        .unwrap_or(false)
                })
                .collect()
        } else {
            debug!("first turn, skipping suggestion pass");
            Vec::new()
        };

        Ok(TurnOutput {
            reply: response.content,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use atelier_core::{AgentId, LlmResponse, ScoreMap};
    use atelier_routing::KeywordTable;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Provider that records the last request and echoes.
    #[derive(Default)]
    struct EchoProvider {
        last_request: Mutex<Option<LlmRequest>>,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(LlmResponse {
                content: format!("echo: {}", request.messages.last().unwrap().content),
                provider: "echo".into(),
                model: request.model.clone(),
            })
        }
    }

    struct InertRouter;

    #[async_trait]
    impl KnowledgeRouter for InertRouter {
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

    fn engine(provider: Arc<EchoProvider>) -> TurnEngine {
        let catalog = Arc::new(AgentCatalog::builtin());
        let router: Arc<dyn KnowledgeRouter> = Arc::new(InertRouter);
        let suggestions =
            SuggestionEngine::new(Arc::new(KeywordTable::builtin()), router.clone());
        TurnEngine::new(catalog, provider, router, suggestions, "test-model")
    }

    #[tokio::test]
    async fn first_turn_has_no_suggestions() {
        let provider = Arc::new(EchoProvider::default());
        let engine = engine(provider.clone());
        let mut session = SessionState::new(AgentId::from("larry"));

        let out = engine
            .run_turn(&mut session, "future trends and disruption")
            .await
            .unwrap();

        assert!(out.suggestions.is_empty());
        assert_eq!(session.turn_count(), 1);
    }

    #[tokio::test]
    async fn later_turns_carry_suggestions() {
        let provider = Arc::new(EchoProvider::default());
        let engine = engine(provider.clone());
        let mut session = SessionState::new(AgentId::from("larry"));

        engine.run_turn(&mut session, "hello").await.unwrap();
        let out = engine
            .run_turn(&mut session, "future trends and disruption")
            .await
            .unwrap();

        assert_eq!(out.suggestions[0].agent, AgentId::from("tta"));
        assert_eq!(out.suggestions[0].score, 2.8);
    }

    #[tokio::test]
    async fn persona_prompt_reaches_the_provider() {
        let provider = Arc::new(EchoProvider::default());
        let engine = engine(provider.clone());
        let mut session = SessionState::new(AgentId::from("redteam"));

        engine.run_turn(&mut session, "attack my plan").await.unwrap();

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert!(request.system_prompt.contains("Devil's Advocate"));
    }

    #[tokio::test]
    async fn handoff_context_prepends_once() {
        let provider = Arc::new(EchoProvider::default());
        let engine = engine(provider.clone());
        let mut session = SessionState::new(AgentId::from("redteam"));
        session.pending_handoff = Some("**Your Task:** attack".into());

        engine.run_turn(&mut session, "here is my plan").await.unwrap();
        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert!(request.messages.last().unwrap().content.starts_with("**Your Task:**"));
        // Transcript stores the raw message and the handoff is consumed.
        assert_eq!(session.transcript[0].content, "here is my plan");
        assert!(session.pending_handoff.is_none());

        engine.run_turn(&mut session, "second message").await.unwrap();
        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.messages.last().unwrap().content, "second message");
    }
}
