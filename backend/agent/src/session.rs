//! Active state of one conversation session.

use uuid::Uuid;

use atelier_core::{AgentId, ChatMessage, ChatRole};

/// One chat session bound to a persona.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub agent_id: AgentId,
    /// Full conversation transcript (user and model turns).
    pub transcript: Vec<ChatMessage>,
    /// Pending context block from a handoff, consumed by the next turn.
    pub pending_handoff: Option<String>,
}

impl SessionState {
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            agent_id,
            transcript: Vec::new(),
            pending_handoff: None,
        }
    }

    /// Completed turns so far (one turn = user message + model reply).
    pub fn turn_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count()
    }

    /// Rebind the session to another persona, keeping the transcript.
    pub fn switch_agent(&mut self, agent_id: AgentId, handoff_context: Option<String>) {
        self.agent_id = agent_id;
        self.pending_handoff = handoff_context;
    }
}
