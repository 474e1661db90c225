//! Session state and per-turn orchestration.
//!
//! A turn: enrich, call the provider with the active persona's prompt,
//! update the transcript, then (after the first completed turn) run the
//! advisory suggestion pass.

pub mod provider;
pub mod session;
pub mod turn;

pub use provider::GeminiProvider;
pub use session::SessionState;
pub use turn::{TurnEngine, TurnOutput};
