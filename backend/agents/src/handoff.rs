//! Structured handoff context between personas.
//!
//! When the user accepts a switch suggestion, the new persona receives a
//! structured, problem-focused context block instead of the entire
//! conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffKind {
    /// Work is assigned, results come back to the sender.
    Delegate,
    /// Full control passes to the target persona.
    Transfer,
    /// A workshop completes and results return to the default persona.
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandoffMode {
    #[default]
    Sequential,
    Parallel,
    Debate,
}

/// Clarity of the problem definition, scored 0-1 per dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemClarity {
    pub what: String,
    pub who: String,
    pub success: String,
    pub what_score: f64,
    pub who_score: f64,
    pub success_score: f64,
}

impl ProblemClarity {
    pub fn overall_score(&self) -> f64 {
        (self.what_score + self.who_score + self.success_score) / 3.0
    }

    /// A problem is considered clear enough to hand off at >= 0.7.
    pub fn is_clear(&self) -> bool {
        self.overall_score() >= 0.7
    }
}

/// Context block passed along with a handoff. Every field is optional
/// on the wire; senders fill in only what they know.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffContext {
    pub problem_what: String,
    pub problem_who: String,
    pub problem_success: String,
    pub conversation_summary: String,
    pub key_constraints: Vec<String>,
    pub task_description: String,
    pub expected_output: String,
    pub session_id: String,
}

impl HandoffContext {
    /// Render the populated fields into a prompt-ready block.
    pub fn to_prompt_context(&self) -> String {
        let mut parts = Vec::new();

        if !self.problem_what.is_empty() {
            parts.push(format!("**Problem (What):** {}", self.problem_what));
        }
        if !self.problem_who.is_empty() {
            parts.push(format!("**Target User (Who):** {}", self.problem_who));
        }
        if !self.problem_success.is_empty() {
            parts.push(format!("**Success Criteria:** {}", self.problem_success));
        }
        if !self.conversation_summary.is_empty() {
            parts.push(format!("\n**Context:** {}", self.conversation_summary));
        }
        if !self.key_constraints.is_empty() {
            parts.push(format!(
                "\n**Constraints:** {}",
                self.key_constraints.join(", ")
            ));
        }
        if !self.task_description.is_empty() {
            parts.push(format!("\n**Your Task:** {}", self.task_description));
        }
        if !self.expected_output.is_empty() {
            parts.push(format!("**Expected Output:** {}", self.expected_output));
        }

        parts.join("\n")
    }
}

/// A recorded handoff between two personas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handoff {
    pub kind: HandoffKind,
    pub from_agent: AgentId,
    pub to_agent: AgentId,
    pub mode: HandoffMode,
    pub context: HandoffContext,
    pub created_at: DateTime<Utc>,
}

/// Append-only history of handoffs, kept for observability.
#[derive(Debug, Default)]
pub struct HandoffLog {
    history: Vec<Handoff>,
}

impl HandoffLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: HandoffKind,
        from: AgentId,
        to: AgentId,
        context: HandoffContext,
        mode: HandoffMode,
    ) -> &Handoff {
        self.history.push(Handoff {
            kind,
            from_agent: from,
            to_agent: to,
            mode,
            context,
            created_at: Utc::now(),
        });
        self.history.last().expect("just pushed")
    }

    /// History entries, optionally filtered to one session.
    pub fn history(&self, session_id: Option<&str>) -> Vec<&Handoff> {
        match session_id {
            Some(id) => self
                .history
                .iter()
                .filter(|h| h.context.session_id == id)
                .collect(),
            None => self.history.iter().collect(),
        }
    }

    pub fn clear(&mut self, session_id: Option<&str>) {
        match session_id {
            Some(id) => self.history.retain(|h| h.context.session_id != id),
            None => self.history.clear(),
        }
    }
}
