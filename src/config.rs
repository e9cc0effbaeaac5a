//! Assistant configuration loading.
//!
//! Reads `deskmate.yaml` and resolves environment variables. Every section
//! and field has a default, so a missing file or an empty document yields a
//! usable configuration. The loaded value is passed into constructors; nothing
//! reads it from a global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::inference::Sampling;

/// File name searched for when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "deskmate.yaml";

/// Env var holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "DESKMATE_CONFIG";

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {reason}")]
    Parse { reason: String },
}

// ─── Public Types ────────────────────────────────────────────────────────────

/// Top-level configuration (mirrors `deskmate.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub actions: ActionsConfig,
    pub memory: MemoryConfig,
    pub web: WebConfig,
    pub prompts: PromptsConfig,
    pub suggestions: SuggestionsConfig,
}

/// Model endpoint and the two model roles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama-compatible endpoint root (no `/api` suffix).
    pub base_url: String,
    /// Small model used for classification.
    pub control_model: String,
    /// Model used to write answers.
    pub generation_model: String,
    pub timeout_secs: u64,
    pub control_sampling: Sampling,
    pub generation_sampling: Sampling,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            control_model: "phi3:mini".into(),
            generation_model: "mistral:7b".into(),
            timeout_secs: 120,
            control_sampling: Sampling::deterministic(),
            generation_sampling: Sampling::conversational(),
        }
    }
}

/// Regeneration policy for responses emptied by the guard.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 1,
        }
    }
}

/// Local actions. Disabled unless turned on explicitly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub enabled: bool,
    /// Extra or overriding app entries: spoken name → command line.
    pub apps: HashMap<String, String>,
    /// Extra or overriding folder entries: name → path (`~` allowed).
    pub folders: HashMap<String, String>,
    /// Extensions that may be opened, with the leading dot.
    pub file_extensions: Vec<String>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            apps: HashMap::new(),
            folders: HashMap::new(),
            file_extensions: [".pdf", ".png", ".jpg", ".jpeg", ".txt", ".docx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Reads return nothing when false. Toggled at runtime by governance.
    pub enabled: bool,
    pub write_enabled: bool,
    /// SQLite file; defaults to `<data_dir>/memory.db`.
    pub db_path: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            write_enabled: true,
            db_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    pub max_sources: usize,
    pub timeout_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sources: 5,
            timeout_secs: 10,
        }
    }
}

/// Location of the prompt text files.
///
/// The directory holds optional `philosophy.txt`, `persona.txt`, `limits.txt`
/// and `templates/<mode>.txt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub dir: Option<String>,
}

/// Preference and habit hints placed in front of replies.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub enabled: bool,
    /// Prefix each hint with an emoji.
    pub icons: bool,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icons: true,
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Locate the config file.
///
/// Checks `DESKMATE_CONFIG` first, then walks upward from `start` looking for
/// `deskmate.yaml`. Returns `None` when neither finds a file.
pub fn find_config_path(start: &Path) -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(expand_tilde(&explicit));
        if candidate.exists() {
            return Some(candidate);
        }
        tracing::warn!(path = %candidate.display(), "configured config path does not exist");
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load and parse a config file.
///
/// Performs environment-variable interpolation on `${VAR_NAME}` and
/// `${VAR_NAME:-default}` before parsing.
pub fn load_config(path: &Path) -> Result<AssistantConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_config(&raw)
}

/// Parse config text. An empty document yields the defaults.
pub fn parse_config(raw: &str) -> Result<AssistantConfig, ConfigError> {
    let interpolated = interpolate_env_vars(raw);
    if interpolated.trim().is_empty() {
        return Ok(AssistantConfig::default());
    }
    serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })
}

/// Find and load the config, falling back to defaults when no file exists.
pub fn load_or_default(start: &Path) -> Result<(AssistantConfig, Option<PathBuf>), ConfigError> {
    match find_config_path(start) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => Ok((AssistantConfig::default(), None)),
    }
}

// ─── Env-var interpolation ───────────────────────────────────────────────────

/// Replace `${VAR}` and `${VAR:-default}` in a string.
fn interpolate_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_expr = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_expr.push(c);
            }
            result.push_str(&resolve_var_expr(&var_expr));
        } else {
            result.push(ch);
        }
    }

    result
}

/// Resolve `VAR` or `VAR:-default`.
fn resolve_var_expr(expr: &str) -> String {
    match expr.split_once(":-") {
        Some((name, default)) => std::env::var(name).unwrap_or_else(|_| expand_tilde(default)),
        None => std::env::var(expr).unwrap_or_default(),
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.display());
        }
    }
    path.to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
