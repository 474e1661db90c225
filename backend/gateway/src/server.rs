//! Gateway HTTP server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use atelier_agent::{SessionState, TurnEngine};
use atelier_agents::{AgentCatalog, HandoffLog};
use atelier_routing::SuggestionEngine;

use crate::api;

/// Application state shared across routes.
///
/// Sessions are individually locked so one slow turn never blocks
/// traffic on other sessions; the outer map lock is only held for
/// lookup, insert, and removal.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<AgentCatalog>,
    pub turns: TurnEngine,
    pub suggestions: SuggestionEngine,
    pub sessions: Arc<RwLock<HashMap<String, Arc<Mutex<SessionState>>>>>,
    pub handoffs: Arc<RwLock<HandoffLog>>,
}

impl AppState {
    pub fn new(catalog: Arc<AgentCatalog>, turns: TurnEngine, suggestions: SuggestionEngine) -> Self {
        Self {
            catalog,
            turns,
            suggestions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            handoffs: Arc::new(RwLock::new(HandoffLog::new())),
        }
    }
}

/// Build the route table.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::root_info))
        .route("/api/health", get(api::health))
        .route("/api/agents", get(api::list_agents))
        .route("/api/sessions", post(api::create_session))
        .route("/api/sessions/:id", axum::routing::delete(api::delete_session))
        .route("/api/sessions/:id/messages", post(api::post_message))
        .route("/api/sessions/:id/switch", post(api::switch_agent))
        .route("/api/route/suggest", post(api::suggest))
        .with_state(state)
}

/// Start serving on the given address.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);
    info!("gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
