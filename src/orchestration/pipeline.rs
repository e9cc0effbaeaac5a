//! The per-turn pipeline: classify, then route to governance, actions,
//! automation, or generation.
//!
//! Turns are strictly sequential. Each one runs inside a `turn` span carrying
//! a fresh UUID so its log lines can be grouped.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use super::errors::AssistantError;
use super::retry::RetryOrchestrator;
use crate::actions::{ActionManager, Allowlist, Launcher, SystemLauncher};
use crate::automation::{self, AutomationRunner};
use crate::config::{expand_tilde, AssistantConfig};
use crate::control::classifier::action_control;
use crate::control::{Classifier, Control, Mode};
use crate::guard::ResponseGuard;
use crate::inference::{ModelHandle, OllamaClient, TextGenerator};
use crate::memory::{GovernanceHandler, MemoryManager};
use crate::prompt::PromptComposer;
use crate::suggestions::SuggestionEngine;
use crate::web::{DuckDuckGoProvider, SearchProvider, WebSearch};

/// Returned when the guarded answer is still empty after any retries.
pub const NO_USABLE_RESPONSE: &str =
    "I couldn't produce a usable response. Please rephrase and try again.";

const NO_ACTION: &str = "No action detected. Please try again.";

/// Collaborators an `Assistant` is assembled from.
pub struct AssistantParts {
    pub control_generator: Arc<dyn TextGenerator>,
    pub generation_generator: Arc<dyn TextGenerator>,
    pub memory: Arc<MemoryManager>,
    pub launcher: Arc<dyn Launcher>,
    pub search: Arc<dyn SearchProvider>,
    pub allowlist: Allowlist,
    pub composer: PromptComposer,
}

pub struct Assistant {
    classifier: Classifier,
    governance: GovernanceHandler,
    actions: Arc<ActionManager>,
    runner: AutomationRunner,
    memory: Arc<MemoryManager>,
    web: WebSearch,
    composer: PromptComposer,
    retry: RetryOrchestrator,
    suggestions: SuggestionEngine,
}

impl Assistant {
    pub fn new(config: &AssistantConfig, parts: AssistantParts) -> Self {
        let actions = Arc::new(
            ActionManager::new(config.actions.enabled, parts.allowlist, parts.launcher)
                .with_habits(parts.memory.clone()),
        );

        Self {
            classifier: Classifier::new(parts.control_generator),
            governance: GovernanceHandler::new(parts.memory.clone()),
            runner: AutomationRunner::new(actions.clone()),
            actions,
            web: WebSearch::new(parts.search, &config.web),
            composer: parts.composer,
            retry: RetryOrchestrator::new(
                parts.generation_generator,
                ResponseGuard::new(),
                config.retry,
            ),
            suggestions: SuggestionEngine::from_config(parts.memory.clone(), &config.suggestions),
            memory: parts.memory,
        }
    }

    /// Wire the production collaborators: both model roles on `client`, the
    /// SQLite store under `data_dir`, DuckDuckGo search and the OS launcher.
    pub fn from_config(
        config: &AssistantConfig,
        client: Arc<OllamaClient>,
        data_dir: &Path,
    ) -> Result<Self, AssistantError> {
        let llm = &config.llm;
        let control_generator = Arc::new(ModelHandle::new(
            client.clone(),
            llm.control_model.clone(),
            llm.control_sampling,
        ));
        let generation_generator = Arc::new(ModelHandle::new(
            client,
            llm.generation_model.clone(),
            llm.generation_sampling,
        ));

        let memory = Arc::new(MemoryManager::open(&config.memory, data_dir)?);
        let search = Arc::new(DuckDuckGoProvider::new(Duration::from_secs(
            config.web.timeout_secs,
        ))?);

        let prompts_dir = config
            .prompts
            .dir
            .as_deref()
            .map(|dir| std::path::PathBuf::from(expand_tilde(dir)));

        tracing::info!(
            control_model = %llm.control_model,
            generation_model = %llm.generation_model,
            actions_enabled = config.actions.enabled,
            web_enabled = config.web.enabled,
            "assistant ready"
        );

        Ok(Self::new(
            config,
            AssistantParts {
                control_generator,
                generation_generator,
                memory,
                launcher: Arc::new(SystemLauncher),
                search,
                allowlist: Allowlist::from_config(&config.actions),
                composer: PromptComposer::load(prompts_dir.as_deref()),
            },
        ))
    }

    pub fn memory(&self) -> &Arc<MemoryManager> {
        &self.memory
    }

    /// Handle one user message and produce the reply text.
    pub async fn handle(&self, text: &str) -> Result<String, AssistantError> {
        let span = tracing::info_span!("turn", id = %uuid::Uuid::new_v4());
        self.handle_turn(text).instrument(span).await
    }

    async fn handle_turn(&self, text: &str) -> Result<String, AssistantError> {
        let control = self.classifier.classify(text).await?;

        match control.mode {
            Mode::MemoryGovernance => Ok(self.governance.run(text)?),
            Mode::Automation => self.automate(text).await,
            Mode::Action => {
                let reply = self.actions.run(&control)?;
                Ok(self.suggest(text, &control, reply))
            }
            _ => self.respond(&control, text).await,
        }
    }

    /// Prefix preference and habit hints; a memory failure leaves the reply as is.
    fn suggest(&self, text: &str, control: &Control, reply: String) -> String {
        match self.suggestions.apply(text, control, &reply) {
            Ok(with_hints) => with_hints,
            Err(e) => {
                tracing::warn!(error = %e, "suggestions skipped");
                reply
            }
        }
    }

    // ─── Automation ─────────────────────────────────────────────────────

    async fn automate(&self, text: &str) -> Result<String, AssistantError> {
        let steps = automation::parse(text);

        if steps.is_empty() {
            tracing::info!("automation parse empty, running as single action");
            return match action_control(text) {
                Some(control) => Ok(self.actions.run(&control)?),
                None => Ok(NO_ACTION.into()),
            };
        }

        tracing::info!(steps = steps.len(), "automation parsed");

        let mut controls = Vec::with_capacity(steps.len());
        for step in &steps {
            controls.push(self.classifier.classify(step).await?);
        }

        let results = self.runner.run(controls)?;
        Ok(results.join("\n"))
    }

    // ─── Generation ─────────────────────────────────────────────────────

    async fn respond(&self, control: &Control, text: &str) -> Result<String, AssistantError> {
        let memory = self.memory.read(control)?;

        let web = self.web.run(control, text).await;
        if web.is_some() {
            self.remember("search.web", || self.memory.record_habit("search.web"));
        }

        let prompt = self
            .composer
            .compose(control, text, Some(&memory), web.as_deref());
        let answer = self.retry.run(control, &prompt).await?;

        if answer.is_empty() {
            tracing::warn!(mode = %control.mode, "no usable response");
            return Ok(NO_USABLE_RESPONSE.into());
        }

        self.remember("write", || self.memory.write(control, &answer, text));
        self.remember("exchange", || {
            self.memory.record_exchange(control, text, &answer)
        });
        if control.mode != Mode::NsfwOpenAnalytical {
            let habit = format!("mode.{}", control.mode.as_str().to_lowercase());
            self.remember("mode habit", || self.memory.record_habit(&habit));
        }

        tracing::info!(mode = %control.mode, answer_len = answer.len(), "turn answered");
        Ok(self.suggest(text, control, answer))
    }

    /// Memory writes after an answer never fail the turn.
    fn remember<F>(&self, what: &str, write: F)
    where
        F: FnOnce() -> Result<(), crate::memory::MemoryError>,
    {
        if let Err(e) = write() {
            tracing::warn!(what, error = %e, "memory write failed");
        }
    }
}
