use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for a selectable persona (e.g. "larry", "tta").
///
/// Ordered so that score maps keyed by agent iterate in a canonical
/// alphabetical order, which keeps tie-breaking deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Accumulated score per agent. BTreeMap keeps iteration alphabetical.
pub type ScoreMap = BTreeMap<AgentId, f64>;

/// One ranked switch suggestion handed to the chat surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub agent: AgentId,
    pub score: f64,
}

/// Maximum number of characters of the query kept in a trace.
pub const TRACE_QUERY_MAX: usize = 120;

/// Write-only record of one scoring pass, emitted to the log sink.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTrace {
    /// Query excerpt, truncated to [`TRACE_QUERY_MAX`] characters.
    pub query: String,
    pub keyword_scores: ScoreMap,
    pub graph_trace: serde_json::Value,
    pub problem_trace: serde_json::Value,
    pub final_ranked: Vec<(AgentId, f64)>,
}

impl RouteTrace {
    /// Truncate a query for trace storage without splitting a character.
    pub fn excerpt(text: &str) -> String {
        text.chars().take(TRACE_QUERY_MAX).collect()
    }
}
