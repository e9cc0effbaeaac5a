//! Control: classification of one user instruction into a `Control` record.
//!
//! Submodules:
//! - `types`: the `Control` record, its enums and the `CombinationHint`
//! - `classifier`: deterministic pre-rules with a model fallback
//! - `repair`: normalizes raw model output into the canonical schema
//! - `action_extract`: action/target recovery from instruction text
//! - `prompt`: the classification system prompt
//! - `errors`: parse and validation failures

pub mod action_extract;
pub mod classifier;
pub mod errors;
pub mod prompt;
pub mod repair;
pub mod types;

pub use classifier::Classifier;
pub use errors::ControlError;
pub use repair::repair;
pub use types::{ActionKind, CombinationHint, Context, Control, Mode, Risk, Tone};
