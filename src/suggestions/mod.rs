//! Suggestions: preference and habit hints in front of replies.

pub mod engine;

pub use engine::{SuggestionEngine, SuggestionStyle};
