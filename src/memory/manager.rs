//! Memory policy: what gets read into a prompt and what gets written back.
//!
//! NSFW turns only ever see NSFW notes, and NSFW content is only written to
//! NSFW notes. The `enabled` flag is the one piece of runtime-mutable
//! configuration; it is flipped by the governance API.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::errors::MemoryError;
use super::preference_detector;
use super::store::{MemoryStore, NoteKind};
use crate::config::MemoryConfig;
use crate::control::{Control, Mode};

/// Notes of each kind pulled into a prompt.
const READ_WINDOW: usize = 20;

/// User-readable snapshot of everything remembered (NSFW excluded).
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySummary {
    pub preferences: BTreeMap<String, String>,
    pub habits: BTreeMap<String, u64>,
    pub profile: Vec<String>,
    pub conversation: Vec<String>,
    /// Count only; the content stays isolated.
    pub nsfw_notes: usize,
}

pub struct MemoryManager {
    store: MemoryStore,
    enabled: AtomicBool,
    write_enabled: bool,
}

impl MemoryManager {
    pub fn new(store: MemoryStore, config: &MemoryConfig) -> Self {
        Self {
            store,
            enabled: AtomicBool::new(config.enabled),
            write_enabled: config.write_enabled,
        }
    }

    /// Open the configured database, defaulting to `<data_dir>/memory.db`.
    pub fn open(config: &MemoryConfig, data_dir: &Path) -> Result<Self, MemoryError> {
        let path = match &config.db_path {
            Some(path) => crate::config::expand_tilde(path),
            None => data_dir.join("memory.db").display().to_string(),
        };
        let store = MemoryStore::open(&path)?;
        tracing::info!(path = %path, "memory store opened");
        Ok(Self::new(store, config))
    }

    // ─── Read / write ───────────────────────────────────────────────────

    /// Memory context for a prompt, or `""` when none applies.
    pub fn read(&self, control: &Control) -> Result<String, MemoryError> {
        if !self.is_enabled() {
            return Ok(String::new());
        }

        if control.mode == Mode::NsfwOpenAnalytical {
            tracing::info!(memory_type = "nsfw", "memory read");
            return Ok(self.store.recent_notes(NoteKind::Nsfw, READ_WINDOW)?.join("\n"));
        }

        if control.memory_read {
            tracing::info!(memory_type = "profile+conversation", "memory read");
            let mut parts = self.store.recent_notes(NoteKind::Profile, READ_WINDOW)?;
            parts.extend(self.store.recent_notes(NoteKind::Conversation, READ_WINDOW)?);
            return Ok(parts.join("\n"));
        }

        Ok(String::new())
    }

    /// Persist what a turn asked to be remembered.
    ///
    /// A preference statement in `user_input` is stored as a preference and
    /// nothing else is written for the turn.
    pub fn write(
        &self,
        control: &Control,
        content: &str,
        user_input: &str,
    ) -> Result<(), MemoryError> {
        if !self.can_write() {
            return Ok(());
        }

        if let Some(pref) = preference_detector::detect(user_input) {
            self.store.set_preference(pref.key, pref.value)?;
            tracing::info!(key = pref.key, "preference stored from input");
            return Ok(());
        }

        if control.mode == Mode::NsfwOpenAnalytical {
            self.store.append_note(NoteKind::Nsfw, content)?;
            tracing::info!(memory_type = "nsfw", "memory write");
            return Ok(());
        }

        if control.memory_write {
            self.store.append_note(NoteKind::Profile, content)?;
            tracing::info!(memory_type = "profile", "memory write");
        }

        Ok(())
    }

    /// Append one question/answer pair to conversation memory.
    ///
    /// NSFW exchanges are never recorded here.
    pub fn record_exchange(
        &self,
        control: &Control,
        user_input: &str,
        answer: &str,
    ) -> Result<(), MemoryError> {
        if !self.can_write() || control.mode == Mode::NsfwOpenAnalytical {
            return Ok(());
        }
        let entry = format!("User: {}\nAssistant: {}", user_input.trim(), answer.trim());
        self.store.append_note(NoteKind::Conversation, &entry)
    }

    fn can_write(&self) -> bool {
        self.write_enabled && self.is_enabled()
    }

    // ─── Preferences & habits ───────────────────────────────────────────

    pub fn preference(&self, key: &str) -> Result<Option<String>, MemoryError> {
        self.store.preference(key)
    }

    /// Count one occurrence of a behavioural event such as
    /// `action.open_app.chrome` or `mode.factual`. Never raw text.
    pub fn record_habit(&self, event: &str) -> Result<(), MemoryError> {
        if !self.can_write() {
            return Ok(());
        }
        let count = self.store.record_habit(event)?;
        tracing::info!(event, count, "habit recorded");
        Ok(())
    }

    pub fn most_common(&self, prefix: Option<&str>) -> Result<Option<String>, MemoryError> {
        Ok(self.store.most_common_habit(prefix)?.map(|(event, _)| event))
    }

    pub fn frequency(&self, event: &str) -> Result<u64, MemoryError> {
        self.store.habit_count(event)
    }

    // ─── Governance API ─────────────────────────────────────────────────

    pub fn summary(&self) -> Result<MemorySummary, MemoryError> {
        let summary = MemorySummary {
            preferences: self.store.preferences()?,
            habits: self.store.habits()?,
            profile: self.store.recent_notes(NoteKind::Profile, READ_WINDOW)?,
            conversation: self.store.recent_notes(NoteKind::Conversation, READ_WINDOW)?,
            nsfw_notes: self.store.note_count(NoteKind::Nsfw)?,
        };
        tracing::info!(
            preferences_count = summary.preferences.len(),
            habits_count = summary.habits.len(),
            "memory summary requested"
        );
        Ok(summary)
    }

    /// The summary as pretty JSON, for export.
    pub fn summary_json(&self) -> Result<String, MemoryError> {
        Ok(serde_json::to_string_pretty(&self.summary()?)?)
    }

    pub fn clear_all(&self) -> Result<(), MemoryError> {
        self.store.clear_all()?;
        tracing::warn!(action = "user_requested", "all memory cleared");
        Ok(())
    }

    pub fn clear_preferences(&self) -> Result<(), MemoryError> {
        self.store.clear_preferences()?;
        tracing::info!(action = "user_requested", "preferences cleared");
        Ok(())
    }

    pub fn clear_habits(&self) -> Result<(), MemoryError> {
        self.store.clear_habits()?;
        tracing::info!(action = "user_requested", "habits cleared");
        Ok(())
    }

    pub fn clear_conversation(&self) -> Result<(), MemoryError> {
        self.store.clear_notes(NoteKind::Conversation)?;
        tracing::info!(action = "user_requested", "conversation cleared");
        Ok(())
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::warn!(enabled, "memory enabled flag changed");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
