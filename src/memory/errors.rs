//! Memory error types.

use thiserror::Error;

/// Errors that can occur while reading or writing long-term memory.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// SQLite operation failed, or the connection lock was poisoned.
    #[error("database error: {reason}")]
    DatabaseError { reason: String },

    /// Memory could not be encoded for export.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },
}

impl From<rusqlite::Error> for MemoryError {
    fn from(e: rusqlite::Error) -> Self {
        MemoryError::DatabaseError {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for MemoryError {
    fn from(e: serde_json::Error) -> Self {
        MemoryError::SerializationError {
            reason: e.to_string(),
        }
    }
}
