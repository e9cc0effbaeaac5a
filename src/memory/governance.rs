//! User-facing memory commands: inspect, forget, disable, enable.
//!
//! Commands are matched by substring on the lower-cased input, in a fixed
//! order where the first match wins.

use std::fmt::Write as _;
use std::sync::Arc;

use super::errors::MemoryError;
use super::manager::{MemorySummary, MemoryManager};

const HELP_TEXT: &str = "I didn't understand that memory command.\n\n\
Try:\n  \
- 'What do you remember about me?' - Show all memory\n  \
- 'Forget my preferences' - Clear preferences only\n  \
- 'Forget my habits' - Clear habits only\n  \
- 'Forget this' - Clear recent conversation\n  \
- 'Clear memory' - Clear everything\n  \
- 'Disable memory' - Stop learning\n  \
- 'Enable memory' - Start learning again";

/// One recognised governance command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernanceCommand {
    Inspect,
    ForgetPreferences,
    ForgetHabits,
    ForgetConversation,
    ClearAll,
    Disable,
    Enable,
}

impl GovernanceCommand {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        let cmd = if text.contains("show") || text.contains("remember") {
            Self::Inspect
        } else if text.contains("forget my preferences") {
            Self::ForgetPreferences
        } else if text.contains("forget my habits") {
            Self::ForgetHabits
        } else if text.contains("forget this") {
            Self::ForgetConversation
        } else if text.contains("clear memory") || text.contains("clear all memory") {
            Self::ClearAll
        } else if text.contains("disable memory") {
            Self::Disable
        } else if text.contains("enable memory") {
            Self::Enable
        } else {
            return None;
        };
        Some(cmd)
    }
}

pub struct GovernanceHandler {
    memory: Arc<MemoryManager>,
}

impl GovernanceHandler {
    pub fn new(memory: Arc<MemoryManager>) -> Self {
        Self { memory }
    }

    /// Execute a governance command and describe the outcome.
    pub fn run(&self, user_input: &str) -> Result<String, MemoryError> {
        let Some(command) = GovernanceCommand::parse(user_input) else {
            tracing::warn!(input_len = user_input.len(), "memory governance unrecognized");
            return Ok(HELP_TEXT.to_string());
        };

        tracing::info!(command = ?command, triggered_by = "user", "memory governance action");

        let reply = match command {
            GovernanceCommand::Inspect => render_summary(&self.memory.summary()?),
            GovernanceCommand::ForgetPreferences => {
                self.memory.clear_preferences()?;
                "Your preferences have been cleared. I'll treat each interaction fresh.".into()
            }
            GovernanceCommand::ForgetHabits => {
                self.memory.clear_habits()?;
                "Your habit history has been cleared. I won't remember patterns anymore.".into()
            }
            GovernanceCommand::ForgetConversation => {
                self.memory.clear_conversation()?;
                "Done. I've forgotten our recent conversation.".into()
            }
            GovernanceCommand::ClearAll => {
                self.memory.clear_all()?;
                "All memory has been cleared completely. I'm starting fresh.".into()
            }
            GovernanceCommand::Disable => {
                self.memory.set_enabled(false);
                "Memory has been disabled. I won't learn or remember anything from now on.".into()
            }
            GovernanceCommand::Enable => {
                self.memory.set_enabled(true);
                "Memory has been enabled. I'll start learning from this point forward.".into()
            }
        };

        Ok(reply)
    }
}

fn render_summary(summary: &MemorySummary) -> String {
    let mut out = String::from("Here's what I remember about you:\n\n");

    if !summary.preferences.is_empty() {
        out.push_str("Preferences:\n");
        for (key, value) in &summary.preferences {
            let _ = writeln!(out, "  - {key}: {value}");
        }
        out.push('\n');
    }

    if !summary.habits.is_empty() {
        out.push_str("Habits:\n");
        for (event, count) in &summary.habits {
            let _ = writeln!(out, "  - {event}: {count}x");
        }
        out.push('\n');
    }

    if !summary.profile.is_empty() {
        out.push_str("Profile notes:\n");
        for note in &summary.profile {
            let _ = writeln!(out, "  - {note}");
        }
        out.push('\n');
    }

    if !summary.conversation.is_empty() {
        let _ = writeln!(
            out,
            "Conversation memory: {} recent exchange(s)\n",
            summary.conversation.len()
        );
    }

    out.push_str("NSFW memory is isolated for your privacy.\n\n");
    out.push_str(
        "You can clear any of this with: 'Clear memory', 'Forget my preferences', or 'Forget my habits'",
    );
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────
