//! Persona catalog for the Atelier platform.
//!
//! Personas are configuration data, not behavior: each one is a fixed
//! system prompt, a welcome message, and a list of tool bindings. The
//! catalog is built once at startup and stays immutable.

pub mod catalog;
pub mod handoff;
pub mod prompts;

pub use catalog::{AgentCatalog, AgentDef};
pub use handoff::{Handoff, HandoffContext, HandoffKind, HandoffLog, HandoffMode, ProblemClarity};
