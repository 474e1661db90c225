//! `atelier suggest` — offline scoring against the keyword table.
//!
//! Runs the full suggestion pass with the inert router, so the output
//! shows exactly what the keyword layer contributes on its own.

use std::sync::Arc;

use anyhow::Result;

use atelier_core::AgentId;
use atelier_routing::{KeywordTable, SuggestionEngine};
use atelier_tools::NullKnowledgeRouter;

pub async fn run(text: &str, current: &str, show_trace: bool) -> Result<()> {
    let engine = SuggestionEngine::new(
        Arc::new(KeywordTable::builtin()),
        Arc::new(NullKnowledgeRouter),
    );
    let outcome = engine.suggest(text, &AgentId::from(current)).await;

    if outcome.suggestions.is_empty() {
        println!("No suggestions above threshold for: {text}");
    } else {
        println!("Suggestions (current: {current}):\n");
        for (rank, s) in outcome.suggestions.iter().enumerate() {
            println!("  {}. {}  {:.2}", rank + 1, s.agent, s.score);
        }
    }

    if show_trace {
        println!("\n{}", serde_json::to_string_pretty(&outcome.trace)?);
    }

    Ok(())
}
