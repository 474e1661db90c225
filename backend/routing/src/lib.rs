//! Advisory persona routing.
//!
//! After each completed chat turn, the suggestion engine scores every
//! persona against the user's latest message (keyword table + external
//! graph signals) and surfaces up to three alternatives worth switching
//! to. It is advisory only: it never performs the switch and it must
//! never fail the surrounding turn.

pub mod keyword;
pub mod suggest;

pub use keyword::KeywordTable;
pub use suggest::{
    SuggestionEngine, SuggestionOutcome, GRAPH_WEIGHT, MAX_SUGGESTIONS, SCORE_THRESHOLD,
};
