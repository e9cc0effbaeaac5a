//! Preference and habit hints placed in front of a reply.
//!
//! Hints are text only. They never change the control record, the action that
//! ran, or the routing of the turn.

use std::sync::Arc;

use crate::config::SuggestionsConfig;
use crate::control::{Control, Mode};
use crate::memory::{MemoryError, MemoryManager};

/// A habit is only mentioned once it has happened this many times.
pub const MIN_HABIT_FREQUENCY: u64 = 2;

/// How hints are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStyle {
    /// Emoji-prefixed hints, including the folder hints.
    Icons,
    /// Plain text with a narrower rule set.
    Plain,
}

pub struct SuggestionEngine {
    memory: Arc<MemoryManager>,
    style: SuggestionStyle,
    enabled: bool,
}

impl SuggestionEngine {
    pub fn new(memory: Arc<MemoryManager>, style: SuggestionStyle) -> Self {
        Self {
            memory,
            style,
            enabled: true,
        }
    }

    pub fn from_config(memory: Arc<MemoryManager>, config: &SuggestionsConfig) -> Self {
        let style = if config.icons {
            SuggestionStyle::Icons
        } else {
            SuggestionStyle::Plain
        };
        Self {
            enabled: config.enabled,
            ..Self::new(memory, style)
        }
    }

    /// `response` with any applicable hints in front, separated by a blank
    /// line. Returned unchanged when no hint applies or memory is disabled.
    pub fn apply(
        &self,
        user_input: &str,
        control: &Control,
        response: &str,
    ) -> Result<String, MemoryError> {
        if !self.enabled || !self.memory.is_enabled() {
            return Ok(response.to_string());
        }

        let hints = self.collect(&user_input.to_lowercase(), control)?;
        if hints.is_empty() {
            return Ok(response.to_string());
        }

        tracing::info!(
            count = hints.len(),
            control_mode = %control.mode,
            control_action = ?control.action,
            "suggestion applied"
        );
        Ok(format!("{}\n\n{response}", hints.join(" ")))
    }

    fn collect(&self, input: &str, control: &Control) -> Result<Vec<String>, MemoryError> {
        let icons = self.style == SuggestionStyle::Icons;
        let is_action = control.mode == Mode::Action;
        let asks_open = input.contains("open");
        let mut hints = Vec::new();

        // ─── Preferences ────────────────────────────────────────────────

        let brief_mode = matches!(control.mode, Mode::Factual | Mode::Analysis | Mode::Opinion);
        if brief_mode && self.memory.preference("answer_length")?.as_deref() == Some("short") {
            hints.push(self.hint("💡", "Keeping it brief as you prefer."));
        }

        if is_action && asks_open {
            let browser_words: &[&str] = if icons {
                &["browser", "chrome", "firefox"]
            } else {
                &["browser", "chrome"]
            };
            if mentions_any(input, browser_words) {
                if let Some(browser) = self.memory.preference("preferred_browser")? {
                    let text = format!("You usually prefer {}.", capitalize(&browser));
                    hints.push(self.hint("🌐", &text));
                }
            }

            if icons && input.contains("folder") {
                if let Some(folder) = self.memory.preference("preferred_folder")? {
                    let text = format!("You usually use {}.", capitalize(&folder));
                    hints.push(self.hint("📁", &text));
                }
            }
        }

        // ─── Habits ─────────────────────────────────────────────────────

        if is_action && asks_open {
            let app_words: &[&str] = if icons {
                &["browser", "application"]
            } else {
                &["browser"]
            };
            if mentions_any(input, app_words) {
                if let Some((app, count)) = self.frequent_habit("action.open_app")? {
                    let text = format!("You usually open {} ({count}x).", capitalize(&app));
                    hints.push(self.hint("📊", &text));
                }
            }

            if icons && mentions_any(input, &["folder", "directory"]) {
                if let Some((folder, count)) = self.frequent_habit("action.open_folder")? {
                    let text = format!("You often access {} ({count}x).", capitalize(&folder));
                    hints.push(self.hint("📊", &text));
                }
            }
        }

        Ok(hints)
    }

    /// Last segment and count of the most common event under `prefix`, when
    /// it has reached `MIN_HABIT_FREQUENCY`.
    fn frequent_habit(&self, prefix: &str) -> Result<Option<(String, u64)>, MemoryError> {
        let Some(event) = self.memory.most_common(Some(prefix))? else {
            return Ok(None);
        };
        let count = self.memory.frequency(&event)?;
        if count < MIN_HABIT_FREQUENCY {
            return Ok(None);
        }
        let name = event.rsplit('.').next().unwrap_or(&event).to_string();
        Ok(Some((name, count)))
    }

    fn hint(&self, icon: &str, text: &str) -> String {
        match self.style {
            SuggestionStyle::Icons => format!("{icon} {text}"),
            SuggestionStyle::Plain => text.to_string(),
        }
    }
}

fn mentions_any(input: &str, words: &[&str]) -> bool {
    words.iter().any(|w| input.contains(w))
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
