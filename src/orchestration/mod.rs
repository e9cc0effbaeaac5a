//! Orchestration: one user turn from text to reply.
//!
//! - `pipeline`: the `Assistant` and its routing by mode
//! - `retry`: bounded regeneration for emptied NSFW answers
//! - `errors`: the aggregate error for a turn

pub mod errors;
pub mod pipeline;
pub mod retry;

pub use errors::AssistantError;
pub use pipeline::{Assistant, AssistantParts, NO_USABLE_RESPONSE};
pub use retry::RetryOrchestrator;
