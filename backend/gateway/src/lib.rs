//! HTTP surface for the Atelier runtime.
//!
//! The chat UI talks to this gateway: session lifecycle, per-turn
//! messages with switch suggestions, and a direct scoring endpoint.

pub mod api;
pub mod server;

pub use server::{build_router, start_server, AppState};
