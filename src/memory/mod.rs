//! Memory: long-term preferences, habits and notes.
//!
//! Submodules:
//! - `store`: SQLite persistence (preferences, habits, notes)
//! - `manager`: read/write policy and the governance API
//! - `governance`: user-facing memory commands
//! - `preference_detector`: explicit preference statements in user input
//! - `errors`: memory error types

pub mod errors;
pub mod governance;
pub mod manager;
pub mod preference_detector;
pub mod store;

pub use errors::MemoryError;
pub use governance::GovernanceHandler;
pub use manager::{MemoryManager, MemorySummary};
pub use store::{MemoryStore, NoteKind};
