//! Local action error types.
//!
//! Only failures of the launch itself are errors. Policy refusals (app not
//! allow-listed, missing target, disallowed extension) are reported to the
//! user as ordinary result text.

use thiserror::Error;

/// Errors raised while executing a local action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The OS refused to spawn the command or opener.
    #[error("failed to launch '{command}': {reason}")]
    LaunchFailed { command: String, reason: String },

    /// Filesystem access failed while resolving a target.
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },
}
