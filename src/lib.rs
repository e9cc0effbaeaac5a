//! Deskmate: a local assistant core.
//!
//! Every user turn is classified into a `Control` record (deterministic
//! pre-rules first, a small model as fallback), repaired, and routed to memory
//! governance, local actions, multi-step automation, or guarded generation.

pub mod actions;
pub mod automation;
pub mod config;
pub mod control;
pub mod guard;
pub mod inference;
pub mod logging;
pub mod memory;
pub mod orchestration;
pub mod prompt;
pub mod suggestions;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

pub use control::{Classifier, Control, Mode};
pub use orchestration::{Assistant, AssistantError};

/// Platform data directory for Deskmate (logs and the memory database).
///
/// - macOS: `~/Library/Application Support/deskmate/`
/// - Windows: `{FOLDERID_RoamingAppData}\deskmate\`
/// - Linux: `$XDG_DATA_HOME/deskmate/` (fallback `~/.local/share/deskmate/`)
///
/// Falls back to `~/.deskmate/` only if none of the above can be resolved.
pub fn data_dir() -> std::path::PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("deskmate");
    }
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".deskmate")
}
