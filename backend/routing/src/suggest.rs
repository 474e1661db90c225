//! Suggestion aggregator.
//!
//! Merges three score sources — the static keyword table, the external
//! graph scorer, and the problem-language classifier — into a ranked
//! list of personas worth switching to.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use atelier_core::{AgentId, KnowledgeRouter, RouteTrace, ScoreMap, Suggestion};

use crate::keyword::KeywordTable;

/// Minimum final score for a persona to be suggested.
pub const SCORE_THRESHOLD: f64 = 0.3;

/// External contributions (graph + problem) are weighted 1.5x relative
/// to keyword contributions. This ratio is part of the scoring contract.
pub const GRAPH_WEIGHT: f64 = 1.5;

/// At most this many suggestions are returned per pass.
pub const MAX_SUGGESTIONS: usize = 3;

/// Result of one scoring pass: the ranked list plus its trace.
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<Suggestion>,
    pub trace: RouteTrace,
}

/// Scores personas against a user message, once per completed turn.
///
/// Builds fresh state per invocation; the only shared pieces are the
/// immutable keyword table and the router handle.
#[derive(Clone)]
pub struct SuggestionEngine {
    keywords: Arc<KeywordTable>,
    router: Arc<dyn KnowledgeRouter>,
}

impl SuggestionEngine {
    pub fn new(keywords: Arc<KeywordTable>, router: Arc<dyn KnowledgeRouter>) -> Self {
        Self { keywords, router }
    }

    /// Rank personas for the given message.
    ///
    /// The currently active persona is never suggested, only scores above
    /// [`SCORE_THRESHOLD`] survive, and external failures degrade to empty
    /// contributions rather than surfacing. Two personas with equal scores
    /// rank alphabetically (the union iterates in canonical order and the
    /// sort is stable).
    pub async fn suggest(&self, text: &str, current: &AgentId) -> SuggestionOutcome {
        let text_lower = text.to_lowercase();
        let keyword_scores = self.keywords.score(&text_lower);

        // The two external sources are independent; issue them together
        // and merge only after both have settled.
        let (graph, problem) = tokio::join!(
            self.graph_contribution(text, current),
            self.problem_contribution(text, current),
        );
        let (graph_scores, graph_trace) = graph;
        let (problem_scores, problem_trace) = problem;

        let all_agents: BTreeSet<&AgentId> = keyword_scores
            .keys()
            .chain(graph_scores.keys())
            .chain(problem_scores.keys())
            .collect();

        let mut merged: Vec<Suggestion> = Vec::new();
        for agent in all_agents {
            if agent == current {
                continue;
            }
            let kw = keyword_scores.get(agent).copied().unwrap_or(0.0);
            let gs = graph_scores.get(agent).copied().unwrap_or(0.0);
            let ps = problem_scores.get(agent).copied().unwrap_or(0.0);
            let final_score = kw + (gs + ps) * GRAPH_WEIGHT;
            if final_score > SCORE_THRESHOLD {
                merged.push(Suggestion {
                    agent: agent.clone(),
                    score: round2(final_score),
                });
            }
        }

        // Stable sort over the alphabetical candidate order.
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        merged.truncate(MAX_SUGGESTIONS);

        let trace = RouteTrace {
            query: RouteTrace::excerpt(text),
            keyword_scores,
            graph_trace,
            problem_trace,
            final_ranked: merged.iter().map(|s| (s.agent.clone(), s.score)).collect(),
        };
        debug!(target: "route_trace", query = %trace.query, ranked = ?trace.final_ranked, "scoring pass");

        SuggestionOutcome {
            suggestions: merged,
            trace,
        }
    }

    async fn graph_contribution(&self, text: &str, current: &AgentId) -> (ScoreMap, Value) {
        match self.router.graph_score_agents(text, current).await {
            Ok((scores, trace)) => (scores, trace),
            Err(err) => {
                warn!(error = %err, "graph scorer unavailable, continuing without it");
                (ScoreMap::new(), Value::Null)
            }
        }
    }

    async fn problem_contribution(&self, text: &str, current: &AgentId) -> (ScoreMap, Value) {
        let gated_on = match self.router.has_problem_language(text).await {
            Ok(flag) => flag,
            Err(err) => {
                warn!(error = %err, "problem-language gate unavailable, treating as off");
                false
            }
        };
        if !gated_on {
            return (ScoreMap::new(), Value::Null);
        }
        match self.router.classify_and_route(text, current).await {
            Ok((scores, trace)) => (scores, trace),
            Err(err) => {
                warn!(error = %err, "problem classifier unavailable, continuing without it");
                (ScoreMap::new(), Value::Null)
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
