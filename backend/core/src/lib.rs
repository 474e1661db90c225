pub mod chat;
pub mod error;
pub mod traits;
pub mod types;

pub use chat::{ChatMessage, ChatRole};
pub use error::AtelierError;
pub use traits::{KnowledgeRouter, LlmProvider, LlmRequest, LlmResponse, Tool};
pub use types::{AgentId, RouteTrace, ScoreMap, Suggestion};
