//! Sequential execution of automation steps.

use std::sync::Arc;

use super::combiner::combine;
use crate::actions::{ActionError, ActionManager};
use crate::control::Control;

/// Runs classified steps one after another, stopping at the first failure.
///
/// Steps that already ran are not rolled back.
pub struct AutomationRunner {
    actions: Arc<ActionManager>,
}

impl AutomationRunner {
    pub fn new(actions: Arc<ActionManager>) -> Self {
        Self { actions }
    }

    pub fn run(&self, controls: Vec<Control>) -> Result<Vec<String>, ActionError> {
        let controls = combine(controls, self.actions.allowlist());
        let total = controls.len();
        let mut results = Vec::with_capacity(total);

        for (i, control) in controls.iter().enumerate() {
            let step = i + 1;
            tracing::info!(
                step,
                total,
                action = ?control.action,
                action_target = ?control.target,
                "automation step"
            );

            match self.actions.run(control) {
                Ok(result) => {
                    tracing::info!(step, action = ?control.action, "automation step succeeded");
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!(step, action = ?control.action, error = %e, "automation step failed");
                    return Err(e);
                }
            }
        }

        Ok(results)
    }
}
