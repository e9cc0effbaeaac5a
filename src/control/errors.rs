//! Control error types.

use thiserror::Error;

use crate::inference::InferenceError;

/// Errors raised while turning user text into a `Control`.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The model output contained no locatable JSON object, or it did not parse.
    #[error("control parse error: {reason}")]
    Parse { raw: String, reason: String },

    /// The repaired record is still missing required keys.
    #[error("control validation error: missing required keys: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The classification model could not be reached or answered badly.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
