//! SQLite persistence for preferences, habits and free-text notes.
//!
//! Uses `rusqlite` in synchronous mode. The connection sits behind a mutex so
//! one store can be shared across the pipeline via `Arc`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::errors::MemoryError;

// ─── Note kinds ─────────────────────────────────────────────────────────────

/// Partition of the `notes` table. NSFW notes never mix with the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Profile,
    Conversation,
    Nsfw,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteKind::Profile => "profile",
            NoteKind::Conversation => "conversation",
            NoteKind::Nsfw => "nsfw",
        }
    }
}

// ─── Store ──────────────────────────────────────────────────────────────────

/// SQLite handle for long-term memory.
pub struct MemoryStore {
    conn: Mutex<Connection>,
}

impl MemoryStore {
    /// Open (or create) the memory database at the given path.
    ///
    /// Pass `":memory:"` for an in-memory database (tests).
    pub fn open(path: &str) -> Result<Self, MemoryError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<(), MemoryError> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habits (
                event TEXT PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 0,
                last_seen TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_notes_kind ON notes(kind, id);
            ",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, MemoryError> {
        self.conn.lock().map_err(|_| MemoryError::DatabaseError {
            reason: "memory connection lock poisoned".into(),
        })
    }

    // ─── Preferences ────────────────────────────────────────────────────

    pub fn set_preference(&self, key: &str, value: &str) -> Result<(), MemoryError> {
        self.conn()?.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now()],
        )?;
        Ok(())
    }

    pub fn preference(&self, key: &str) -> Result<Option<String>, MemoryError> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn preferences(&self) -> Result<BTreeMap<String, String>, MemoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut out = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            out.insert(key, value);
        }
        Ok(out)
    }

    pub fn clear_preferences(&self) -> Result<(), MemoryError> {
        self.conn()?.execute("DELETE FROM preferences", [])?;
        Ok(())
    }

    // ─── Habits ─────────────────────────────────────────────────────────

    /// Increment an event counter, returning the new count.
    pub fn record_habit(&self, event: &str) -> Result<u64, MemoryError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO habits (event, count, last_seen) VALUES (?1, 1, ?2)
             ON CONFLICT(event) DO UPDATE SET count = count + 1, last_seen = excluded.last_seen",
            params![event, now()],
        )?;
        let count: i64 = conn.query_row(
            "SELECT count FROM habits WHERE event = ?1",
            params![event],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    pub fn habit_count(&self, event: &str) -> Result<u64, MemoryError> {
        let count: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT count FROM habits WHERE event = ?1",
                params![event],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    /// Most frequent event, optionally restricted to a prefix.
    ///
    /// Ties go to the event recorded first.
    pub fn most_common_habit(
        &self,
        prefix: Option<&str>,
    ) -> Result<Option<(String, u64)>, MemoryError> {
        let prefix = prefix.unwrap_or("");
        let row: Option<(String, i64)> = self
            .conn()?
            .query_row(
                "SELECT event, count FROM habits
                 WHERE substr(event, 1, length(?1)) = ?1
                 ORDER BY count DESC, rowid ASC
                 LIMIT 1",
                params![prefix],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row.map(|(event, count)| (event, count.max(0) as u64)))
    }

    pub fn habits(&self) -> Result<BTreeMap<String, u64>, MemoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT event, count FROM habits")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        let mut out = BTreeMap::new();
        for row in rows {
            let (event, count) = row?;
            out.insert(event, count.max(0) as u64);
        }
        Ok(out)
    }

    pub fn clear_habits(&self) -> Result<(), MemoryError> {
        self.conn()?.execute("DELETE FROM habits", [])?;
        Ok(())
    }

    // ─── Notes ──────────────────────────────────────────────────────────

    pub fn append_note(&self, kind: NoteKind, content: &str) -> Result<(), MemoryError> {
        self.conn()?.execute(
            "INSERT INTO notes (kind, content, created_at) VALUES (?1, ?2, ?3)",
            params![kind.as_str(), content, now()],
        )?;
        Ok(())
    }

    /// The most recent `limit` notes of a kind, oldest first.
    pub fn recent_notes(&self, kind: NoteKind, limit: usize) -> Result<Vec<String>, MemoryError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT content FROM (
                SELECT id, content FROM notes WHERE kind = ?1 ORDER BY id DESC LIMIT ?2
             ) ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![kind.as_str(), limit as i64], |row| row.get(0))?;
        let notes = rows.collect::<Result<Vec<String>, _>>()?;
        Ok(notes)
    }

    pub fn note_count(&self, kind: NoteKind) -> Result<usize, MemoryError> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM notes WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }

    pub fn clear_notes(&self, kind: NoteKind) -> Result<(), MemoryError> {
        self.conn()?
            .execute("DELETE FROM notes WHERE kind = ?1", params![kind.as_str()])?;
        Ok(())
    }

    /// Drop every row in every table.
    pub fn clear_all(&self) -> Result<(), MemoryError> {
        self.conn()?.execute_batch(
            "DELETE FROM preferences; DELETE FROM habits; DELETE FROM notes;",
        )?;
        Ok(())
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> MemoryStore {
        MemoryStore::open(":memory:").unwrap()
    }

    #[test]
    fn preference_upsert() {
        let store = test_store();
        store.set_preference("preferred_browser", "chrome").unwrap();
        store.set_preference("preferred_browser", "firefox").unwrap();
        assert_eq!(
            store.preference("preferred_browser").unwrap().as_deref(),
            Some("firefox")
        );
        assert_eq!(store.preferences().unwrap().len(), 1);
        assert_eq!(store.preference("missing").unwrap(), None);
    }

    #[test]
    fn habit_counts_accumulate() {
        let store = test_store();
        assert_eq!(store.record_habit("mode.factual").unwrap(), 1);
        assert_eq!(store.record_habit("mode.factual").unwrap(), 2);
        assert_eq!(store.habit_count("mode.factual").unwrap(), 2);
        assert_eq!(store.habit_count("mode.opinion").unwrap(), 0);
    }

    #[test]
    fn most_common_respects_prefix() {
        let store = test_store();
        store.record_habit("action.open_app.chrome").unwrap();
        store.record_habit("action.open_app.opera").unwrap();
        store.record_habit("action.open_app.opera").unwrap();
        for _ in 0..5 {
            store.record_habit("mode.factual").unwrap();
        }

        assert_eq!(
            store.most_common_habit(Some("action.open_app")).unwrap(),
            Some(("action.open_app.opera".into(), 2))
        );
        assert_eq!(
            store.most_common_habit(None).unwrap(),
            Some(("mode.factual".into(), 5))
        );
        assert_eq!(store.most_common_habit(Some("search.")).unwrap(), None);
    }

    #[test]
    fn most_common_tie_goes_to_first_recorded() {
        let store = test_store();
        store.record_habit("action.open_app.edge").unwrap();
        store.record_habit("action.open_app.chrome").unwrap();
        assert_eq!(
            store.most_common_habit(Some("action.")).unwrap().map(|(e, _)| e),
            Some("action.open_app.edge".into())
        );
    }

    #[test]
    fn notes_are_partitioned_and_ordered() {
        let store = test_store();
        store.append_note(NoteKind::Profile, "likes rust").unwrap();
        store.append_note(NoteKind::Nsfw, "private").unwrap();
        store.append_note(NoteKind::Profile, "lives in Lisbon").unwrap();
        store.append_note(NoteKind::Profile, "has a cat").unwrap();

        assert_eq!(
            store.recent_notes(NoteKind::Profile, 2).unwrap(),
            vec!["lives in Lisbon".to_string(), "has a cat".to_string()]
        );
        assert_eq!(store.recent_notes(NoteKind::Nsfw, 10).unwrap(), vec!["private".to_string()]);
        assert_eq!(store.note_count(NoteKind::Conversation).unwrap(), 0);

        store.clear_notes(NoteKind::Profile).unwrap();
        assert_eq!(store.note_count(NoteKind::Profile).unwrap(), 0);
        assert_eq!(store.note_count(NoteKind::Nsfw).unwrap(), 1);
    }

    #[test]
    fn clear_all_empties_everything() {
        let store = test_store();
        store.set_preference("answer_length", "short").unwrap();
        store.record_habit("mode.search").unwrap();
        store.append_note(NoteKind::Conversation, "hi").unwrap();

        store.clear_all().unwrap();
        assert!(store.preferences().unwrap().is_empty());
        assert!(store.habits().unwrap().is_empty());
        assert_eq!(store.note_count(NoteKind::Conversation).unwrap(), 0);
    }
}
