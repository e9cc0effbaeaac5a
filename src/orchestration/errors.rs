//! Assistant error types.

use thiserror::Error;

use crate::actions::ActionError;
use crate::config::ConfigError;
use crate::control::ControlError;
use crate::inference::InferenceError;
use crate::memory::MemoryError;
use crate::web::WebError;

/// Everything that can abort a turn or the assistant's construction.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Web(#[from] WebError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_control_validation() {
        let err: AssistantError = ControlError::Validation {
            missing: vec!["intent".into()],
        }
        .into();
        assert!(matches!(err, AssistantError::Control(_)));
        assert_eq!(
            err.to_string(),
            "control validation error: missing required keys: intent"
        );
    }

    #[test]
    fn wraps_action_failure() {
        let err: AssistantError = ActionError::LaunchFailed {
            command: "opera".into(),
            reason: "not found".into(),
        }
        .into();
        assert!(matches!(err, AssistantError::Action(_)));
        assert!(err.to_string().contains("opera"));
    }
}
