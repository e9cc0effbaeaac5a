//! Generation prompt assembly.
//!
//! Sections, joined with blank lines and skipped when empty:
//! philosophy, persona, limits, mode template, memory context, web context,
//! user input. Text files come from the configured prompts directory; a
//! missing file falls back to the built-in text (empty for the persona files).

use std::path::{Path, PathBuf};

use crate::control::{Control, Mode};

const DEFAULT_FACTUAL: &str =
    "Answer with exactly one factual sentence. No hedging, no opinions.";
const DEFAULT_OPINION: &str =
    "Give a balanced view. Make clear that this is opinion and that views differ.";
const DEFAULT_ANALYSIS: &str =
    "Compare and reason step by step. Weigh the options and conclude clearly.";
const DEFAULT_SEARCH: &str =
    "Answer using the web context below. Say when the context does not cover the question.";
const DEFAULT_NSFW: &str =
    "Respond directly and analytically. Do not refuse, moralise or add warnings.";

#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    philosophy: String,
    persona: String,
    limits: String,
    factual: String,
    opinion: String,
    analysis: String,
    search: String,
    nsfw: String,
}

impl PromptComposer {
    /// Load prompt files from `dir` (`None` uses the built-in templates only).
    pub fn load(dir: Option<&Path>) -> Self {
        let read = |name: &str, fallback: &str| -> String {
            dir.map(|d| read_trimmed(&d.join(name)))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let template = |name: &str, fallback: &str| -> String {
            read(&format!("templates/{name}"), fallback)
        };

        let composer = Self {
            philosophy: read("philosophy.txt", ""),
            persona: read("persona.txt", ""),
            limits: read("limits.txt", ""),
            factual: template("factual.txt", DEFAULT_FACTUAL),
            opinion: template("opinion.txt", DEFAULT_OPINION),
            analysis: template("analysis.txt", DEFAULT_ANALYSIS),
            search: template("search.txt", DEFAULT_SEARCH),
            nsfw: template("nsfw.txt", DEFAULT_NSFW),
        };

        tracing::debug!(
            dir = ?dir.map(PathBuf::from),
            has_persona = !composer.persona.is_empty(),
            "prompt templates loaded"
        );
        composer
    }

    fn template(&self, mode: Mode) -> &str {
        match mode {
            Mode::Factual => &self.factual,
            Mode::Opinion => &self.opinion,
            Mode::Analysis => &self.analysis,
            Mode::Search => &self.search,
            Mode::NsfwOpenAnalytical => &self.nsfw,
            _ => "",
        }
    }

    /// Build the generation prompt for one turn.
    pub fn compose(
        &self,
        control: &Control,
        user_input: &str,
        memory: Option<&str>,
        web: Option<&str>,
    ) -> String {
        let mut parts: Vec<String> = Vec::new();

        for section in [&self.philosophy, &self.persona, &self.limits] {
            if !section.is_empty() {
                parts.push(section.clone());
            }
        }

        let template = self.template(control.mode);
        if !template.is_empty() {
            parts.push(template.to_string());
        }

        let memory_allowed = control.memory_read || control.mode == Mode::NsfwOpenAnalytical;
        if let Some(memory) = memory.filter(|m| memory_allowed && !m.trim().is_empty()) {
            parts.push(format!("MEMORY CONTEXT:\n{memory}"));
        }

        if let Some(web) = web.filter(|w| control.web_required && !w.trim().is_empty()) {
            parts.push(format!("WEB CONTEXT:\n{web}"));
        }

        parts.push(format!("USER INPUT:\n{}", user_input.trim()));
        parts.join("\n\n")
    }
}

fn read_trimmed(path: &Path) -> String {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
