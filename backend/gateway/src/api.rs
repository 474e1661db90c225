//! Gateway request handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{error, info};

use atelier_agent::SessionState;
use atelier_agents::{HandoffContext, HandoffKind, HandoffMode};
use atelier_core::{AgentId, AtelierError};
use logging::RouteTraceLogger;

use crate::server::AppState;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"error": message.into()})))
}

fn not_found(err: AtelierError) -> ApiError {
    api_error(StatusCode::NOT_FOUND, err.to_string())
}

// ---------------------------------------------------------------------------
// Info and health
// ---------------------------------------------------------------------------

pub async fn root_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "Atelier",
        "description": "Persona-routing thinking-partner platform",
        "agents": state.catalog.len(),
    }))
}

#[derive(Serialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        timestamp: Utc::now(),
    })
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: String,
    pub icon: String,
    pub description: String,
}

pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    let agents = state
        .catalog
        .all()
        .map(|d| AgentSummary {
            id: d.id.clone(),
            name: d.name.clone(),
            icon: d.icon.clone(),
            description: d.description.clone(),
        })
        .collect();
    Json(agents)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub agent_id: Option<AgentId>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub agent_id: AgentId,
    pub welcome: String,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let persona = match &request.agent_id {
        Some(id) => state
            .catalog
            .get(id)
            .ok_or_else(|| not_found(AtelierError::UnknownAgent(id.to_string())))?,
        None => state.catalog.default_agent(),
    };

    let session = SessionState::new(persona.id.clone());
    let response = SessionResponse {
        session_id: session.session_id.clone(),
        agent_id: persona.id.clone(),
        welcome: persona.welcome.clone(),
    };
    info!(session = %session.session_id, agent = %persona.id, "session created");
    state.sessions.write().await.insert(
        session.session_id.clone(),
        Arc::new(Mutex::new(session)),
    );
    Ok(Json(response))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.sessions.write().await.remove(&id);
    if removed.is_none() {
        return Err(not_found(AtelierError::UnknownSession(id)));
    }
    state.handoffs.write().await.clear(Some(&id));
    info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct SuggestionView {
    pub agent_id: AgentId,
    pub name: String,
    pub icon: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub suggestions: Vec<SuggestionView>,
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Take the session handle and release the map lock before the turn
    // runs; only this session is blocked while the provider responds.
    let session = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found(AtelierError::UnknownSession(id.clone())))?;
    let mut session = session.lock().await;

    let output = state
        .turns
        .run_turn(&mut session, &request.text)
        .await
        .map_err(|err| {
            error!(session = %id, error = %err, "turn failed");
            api_error(StatusCode::BAD_GATEWAY, err.to_string())
        })?;

    // Resolve suggestions against the catalog for display; ids the
    // catalog doesn't know are dropped rather than surfaced broken.
    let suggestions = output
        .suggestions
        .iter()
        .filter_map(|s| {
            state.catalog.get(&s.agent).map(|d| SuggestionView {
                agent_id: d.id.clone(),
                name: d.name.clone(),
                icon: d.icon.clone(),
                score: s.score,
            })
        })
        .collect();

    Ok(Json(MessageResponse {
        reply: output.reply,
        suggestions,
    }))
}

#[derive(Deserialize)]
pub struct SwitchRequest {
    pub agent_id: AgentId,
    #[serde(default)]
    pub context: Option<HandoffContext>,
}

#[derive(Serialize)]
pub struct SwitchResponse {
    pub session_id: String,
    pub agent_id: AgentId,
    pub welcome: String,
}

pub async fn switch_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SwitchRequest>,
) -> Result<Json<SwitchResponse>, ApiError> {
    let persona = state
        .catalog
        .get(&request.agent_id)
        .ok_or_else(|| not_found(AtelierError::UnknownAgent(request.agent_id.to_string())))?
        .clone();

    let session = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found(AtelierError::UnknownSession(id.clone())))?;
    let mut session = session.lock().await;

    let from = session.agent_id.clone();
    let mut context = request.context.unwrap_or_default();
    context.session_id = session.session_id.clone();
    let prompt_context = context.to_prompt_context();
    let prompt_context = (!prompt_context.is_empty()).then_some(prompt_context);

    state.handoffs.write().await.record(
        HandoffKind::Transfer,
        from.clone(),
        persona.id.clone(),
        context,
        HandoffMode::Sequential,
    );
    session.switch_agent(persona.id.clone(), prompt_context);
    info!(session = %id, from = %from, to = %persona.id, "persona switched");

    Ok(Json(SwitchResponse {
        session_id: id,
        agent_id: persona.id,
        welcome: persona.welcome,
    }))
}

// ---------------------------------------------------------------------------
// Direct scoring
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SuggestRequest {
    pub text: String,
    pub current_agent_id: AgentId,
}

#[derive(Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<SuggestionView>,
}

/// Score a message without a session (UI preview, diagnostics).
pub async fn suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Json<SuggestResponse> {
    let outcome = state
        .suggestions
        .suggest(&request.text, &request.current_agent_id)
        .await;
    RouteTraceLogger::log("adhoc", &outcome.trace);

    let suggestions = outcome
        .suggestions
        .iter()
        .filter_map(|s| {
            state.catalog.get(&s.agent).map(|d| SuggestionView {
                agent_id: d.id.clone(),
                name: d.name.clone(),
                icon: d.icon.clone(),
                score: s.score,
            })
        })
        .collect();

    Json(SuggestResponse { suggestions })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use atelier_agent::TurnEngine;
    use atelier_agents::AgentCatalog;
    use atelier_core::{
        KnowledgeRouter, LlmProvider, LlmRequest, LlmResponse, ScoreMap,
    };
    use atelier_routing::{KeywordTable, SuggestionEngine};

    use crate::server::{build_router, AppState};

    struct CannedProvider;

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
            Ok(LlmResponse {
                content: "a canned reply".into(),
                provider: "canned".into(),
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

    /// Provider that waits before replying, for lock-contention tests.
    struct SlowProvider(Duration);

    #[async_trait]
    impl LlmProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
            tokio::time::sleep(self.0).await;
            Ok(LlmResponse {
                content: "a slow reply".into(),
                provider: "slow".into(),
                model: request.model.clone(),
            })
        }
    }

    fn test_state_with(provider: Arc<dyn LlmProvider>) -> AppState {
        let catalog = Arc::new(AgentCatalog::builtin());
        let router: Arc<dyn KnowledgeRouter> = Arc::new(InertRouter);
        let suggestions =
            SuggestionEngine::new(Arc::new(KeywordTable::builtin()), router.clone());
        let turns = TurnEngine::new(
            catalog.clone(),
            provider,
            router,
            suggestions.clone(),
            "test-model",
        );
        AppState::new(catalog, turns, suggestions)
    }

    fn test_state() -> AppState {
        test_state_with(Arc::new(CannedProvider))
    }

    async fn json_request(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn agents_listing_has_five_entries() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/agents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let agents: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(agents.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn session_lifecycle_message_and_suggestions() {
        let state = test_state();

        let (status, created) = json_request(
            build_router(state.clone()),
            "POST",
            "/api/sessions",
            json!({"agent_id": "larry"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let session_id = created["session_id"].as_str().unwrap().to_string();
        assert!(created["welcome"].as_str().unwrap().contains("Larry"));

        // First turn: reply but no suggestions yet.
        let (status, first) = json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/messages"),
            json!({"text": "hello"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["reply"], "a canned reply");
        assert_eq!(first["suggestions"].as_array().unwrap().len(), 0);

        // Second turn: keyword hits surface tta.
        let (_, second) = json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/messages"),
            json!({"text": "I'm worried about future trends and disruption"}),
        )
        .await;
        let suggestions = second["suggestions"].as_array().unwrap();
        assert_eq!(suggestions[0]["agent_id"], "tta");
        assert_eq!(suggestions[0]["score"], 2.8);
        assert_eq!(suggestions[0]["name"], "Trending to the Absurd");
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let (status, body) = json_request(
            build_router(test_state()),
            "POST",
            "/api/sessions/nope/messages",
            json!({"text": "hi"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("unknown session"));
    }

    #[tokio::test]
    async fn switch_records_handoff_and_returns_welcome() {
        let state = test_state();
        let (_, created) = json_request(
            build_router(state.clone()),
            "POST",
            "/api/sessions",
            json!({}),
        )
        .await;
        let session_id = created["session_id"].as_str().unwrap().to_string();

        let (status, switched) = json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/switch"),
            json!({
                "agent_id": "redteam",
                "context": {"task_description": "attack the retention assumption"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(switched["agent_id"], "redteam");
        assert!(switched["welcome"].as_str().unwrap().contains("devil's advocate"));

        assert_eq!(state.handoffs.read().await.history(None).len(), 1);
        let sessions = state.sessions.read().await;
        let session = sessions.get(&session_id).unwrap().lock().await;
        assert_eq!(session.agent_id, AgentId::from("redteam"));
        assert!(session.pending_handoff.as_deref().unwrap().contains("attack"));
    }

    #[tokio::test]
    async fn switch_to_unknown_agent_is_404() {
        let state = test_state();
        let (_, created) = json_request(
            build_router(state.clone()),
            "POST",
            "/api/sessions",
            json!({}),
        )
        .await;
        let session_id = created["session_id"].as_str().unwrap();

        let (status, _) = json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/switch"),
            json!({"agent_id": "ghost"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_sessions_process_turns_concurrently() {
        let state = test_state_with(Arc::new(SlowProvider(Duration::from_millis(200))));

        let (_, a) = json_request(build_router(state.clone()), "POST", "/api/sessions", json!({}))
            .await;
        let (_, b) = json_request(build_router(state.clone()), "POST", "/api/sessions", json!({}))
            .await;
        let a_id = a["session_id"].as_str().unwrap();
        let b_id = b["session_id"].as_str().unwrap();

        let started = tokio::time::Instant::now();
        let a_path = format!("/api/sessions/{a_id}/messages");
        let b_path = format!("/api/sessions/{b_id}/messages");
        let (ra, rb) = tokio::join!(
            json_request(
                build_router(state.clone()),
                "POST",
                &a_path,
                json!({"text": "hi"}),
            ),
            json_request(
                build_router(state.clone()),
                "POST",
                &b_path,
                json!({"text": "hi"}),
            ),
        );
        assert_eq!(ra.0, StatusCode::OK);
        assert_eq!(rb.0, StatusCode::OK);
        // Serialized sessions would take two provider delays.
        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn deleted_session_is_gone_and_handoffs_cleared() {
        let state = test_state();
        let (_, created) = json_request(
            build_router(state.clone()),
            "POST",
            "/api/sessions",
            json!({}),
        )
        .await;
        let session_id = created["session_id"].as_str().unwrap().to_string();

        json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/switch"),
            json!({"agent_id": "redteam"}),
        )
        .await;
        assert_eq!(
            state.handoffs.read().await.history(Some(&session_id)).len(),
            1
        );

        let response = build_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/sessions/{session_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state
            .handoffs
            .read()
            .await
            .history(Some(&session_id))
            .is_empty());

        let (status, _) = json_request(
            build_router(state.clone()),
            "POST",
            &format!("/api/sessions/{session_id}/messages"),
            json!({"text": "hi"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/sessions/{session_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn direct_suggest_excludes_current_agent() {
        let (status, body) = json_request(
            build_router(test_state()),
            "POST",
            "/api/route/suggest",
            json!({"text": "future trends and disruption", "current_agent_id": "tta"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let suggestions = body["suggestions"].as_array().unwrap();
        assert!(suggestions.iter().all(|s| s["agent_id"] != "tta"));
    }
}
