//! Classifier: raw user text to a validated `Control`.
//!
//! Deterministic pre-rules run first, in a fixed order where the first match
//! wins:
//! 1. memory governance phrases
//! 2. action verb + automation separator
//! 3. action verb alone
//!
//! Only when none match is the classification model called. Its output is
//! sanitized down to the first `{...}` block, parsed, and repaired.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use super::action_extract::{action_for_target, split_action_verb, strip_trailing_punctuation};
use super::errors::ControlError;
use super::prompt::build_control_prompt;
use super::repair::repair;
use super::types::{Control, Mode};
use crate::automation::parser::SEPARATORS;
use crate::inference::TextGenerator;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Substrings that route an input to memory governance.
pub const GOVERNANCE_PHRASES: [&str; 8] = [
    "what do you remember",
    "show my memory",
    "forget my preferences",
    "forget my habits",
    "clear memory",
    "disable memory",
    "enable memory",
    "forget this",
];

static LANGUAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*json\s*").expect("static regex"));

static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

// ─── Classifier ─────────────────────────────────────────────────────────────

/// Turns user text into a `Control`, consulting the model only as a fallback.
pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
}

impl Classifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classify one instruction.
    ///
    /// Pre-rule matches never fail. The model path fails with
    /// `ControlError::Parse` when no JSON object can be found and with
    /// `ControlError::Validation` when repair cannot fill required keys.
    pub async fn classify(&self, text: &str) -> Result<Control, ControlError> {
        if let Some(control) = pre_classify(text) {
            tracing::info!(
                mode = %control.mode,
                action = ?control.action,
                action_target = ?control.target,
                source = "pre_rule",
                "control decision"
            );
            return Ok(control);
        }

        let prompt = build_control_prompt(text);
        let raw = self.generator.generate(&prompt).await?;
        let clean = sanitize_output(&raw)?;

        let parsed: Value = serde_json::from_str(&clean).map_err(|e| ControlError::Parse {
            raw: clean.clone(),
            reason: format!("invalid JSON from classifier: {e}"),
        })?;

        let Value::Object(record) = parsed else {
            return Err(ControlError::Parse {
                raw: clean,
                reason: "classifier output is not a JSON object".into(),
            });
        };

        let control = repair(record)?;

        tracing::info!(
            mode = %control.mode,
            risk = ?control.risk,
            explicitness = control.explicitness,
            web_required = control.web_required,
            memory_read = control.memory_read,
            memory_write = control.memory_write,
            source = "model",
            "control decision"
        );

        Ok(control)
    }
}

// ─── Pre-rules ──────────────────────────────────────────────────────────────

/// Run the deterministic rules in priority order.
pub fn pre_classify(text: &str) -> Option<Control> {
    if is_memory_governance(text) {
        return Some(Control::new(Mode::MemoryGovernance, "memory governance"));
    }
    if is_explicit_automation(text) {
        return Some(Control::new(Mode::Automation, "multiple explicit actions"));
    }
    action_control(text)
}

/// Case-insensitive substring match against the governance phrases.
pub fn is_memory_governance(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    GOVERNANCE_PHRASES.iter().any(|p| lower.contains(p))
}

/// Starts with an action verb and contains an automation separator.
pub fn is_explicit_automation(text: &str) -> bool {
    if split_action_verb(text).is_none() {
        return false;
    }
    let lower = text.trim().to_lowercase();
    SEPARATORS.iter().any(|sep| lower.contains(sep))
}

/// Build an ACTION control when `text` starts with an action verb.
pub fn action_control(text: &str) -> Option<Control> {
    let (verb, rest) = split_action_verb(text)?;
    let target = strip_trailing_punctuation(rest.trim()).trim();
    let intent = format!("{verb} {target}").to_lowercase();
    let action = action_for_target(target, &intent);

    let target = (!target.is_empty()).then(|| target.to_string());
    Some(Control::action(intent, action, target))
}

// ─── Sanitization ───────────────────────────────────────────────────────────

/// Reduce model output to the JSON object it (hopefully) contains.
///
/// Strips a leading code fence and language tag, then takes the greedy
/// first-`{` to last-`}` span.
pub fn sanitize_output(raw: &str) -> Result<String, ControlError> {
    let mut text = raw.trim();

    if text.starts_with("```") {
        if let Some(inner) = text.split("```").nth(1) {
            text = inner;
        }
    }

    let text = LANGUAGE_TAG_RE.replace(text, "");

    JSON_OBJECT_RE
        .find(&text)
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ControlError::Parse {
            raw: text.to_string(),
            reason: "no JSON object found in classifier output".into(),
        })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::types::{ActionKind, Risk};
    use crate::test_support::ScriptedGenerator;

    fn classifier_with(responses: &[&str]) -> (Classifier, Arc<ScriptedGenerator>) {
        let generator = Arc::new(ScriptedGenerator::new(responses));
        (Classifier::new(generator.clone()), generator)
    }

    // ─── Pre-rules ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn governance_beats_automation_and_action() {
        let (classifier, generator) = classifier_with(&[]);
        let control = classifier.classify("clear memory and open chrome").await.unwrap();
        assert_eq!(control.mode, Mode::MemoryGovernance);
        assert_eq!(control.action, None);
        assert!(!control.memory_read && !control.memory_write && !control.web_required);
        assert_eq!(control.risk, Risk::Legal);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn governance_phrase_inside_open_command() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("Open notes, What do you remember?").await.unwrap();
        assert_eq!(control.mode, Mode::MemoryGovernance);
    }

    #[tokio::test]
    async fn automation_detected_before_action() {
        let (classifier, generator) = classifier_with(&[]);
        let control = classifier
            .classify("Open Opera and open https://google.com")
            .await
            .unwrap();
        assert_eq!(control.mode, Mode::Automation);
        assert_eq!(control.action, None);
        assert_eq!(control.target, None);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn then_separator_counts_as_automation() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("launch Downloads, then open mama.pdf").await.unwrap();
        assert_eq!(control.mode, Mode::Automation);
    }

    #[tokio::test]
    async fn single_dot_file_is_file_path() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("Open resume.pdf").await.unwrap();
        assert_eq!(control.mode, Mode::Action);
        assert_eq!(control.action, Some(ActionKind::OpenFilePath));
        assert_eq!(control.target.as_deref(), Some("resume.pdf"));
        assert_eq!(control.intent, "open resume.pdf");
    }

    #[tokio::test]
    async fn multi_dot_file_falls_through_to_app() {
        // Known boundary of the single-dot heuristic.
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("Open my.big.file.pdf").await.unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenApp));
        assert_eq!(control.target.as_deref(), Some("my.big.file.pdf"));
    }

    #[tokio::test]
    async fn url_and_trailing_punctuation() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("open https://x.com!").await.unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenUrl));
        assert_eq!(control.target.as_deref(), Some("https://x.com"));
    }

    #[tokio::test]
    async fn latest_download_wording() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("Open my newest download.").await.unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenLatestDownload));
    }

    #[tokio::test]
    async fn app_keeps_original_case() {
        let (classifier, _) = classifier_with(&[]);
        let control = classifier.classify("Run Spotify").await.unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenApp));
        assert_eq!(control.target.as_deref(), Some("Spotify"));
        assert_eq!(control.intent, "run spotify");
    }

    // ─── Model fallback ─────────────────────────────────────────────────

    #[tokio::test]
    async fn model_path_repairs_fenced_output() {
        let (classifier, generator) = classifier_with(&[
            "```json\n{\"intent\": \"opinion\", \"mode\": \"OPINION|FACTUAL\", \"explicitness\": 7, \"context\": \"general\", \"tone\": \"opinion\", \"risk\": \"maybe\"}\n```",
        ]);
        let control = classifier.classify("what do people think of tabs?").await.unwrap();
        assert_eq!(control.mode, Mode::Opinion);
        assert_eq!(control.explicitness, 0);
        assert_eq!(control.risk, Risk::Legal);
        assert_eq!(generator.calls(), 1);
        assert!(generator.prompts()[0].ends_with("USER INPUT:\nwhat do people think of tabs?"));
    }

    #[tokio::test]
    async fn model_path_without_json_is_parse_error() {
        let (classifier, _) = classifier_with(&["I am not sure what you mean."]);
        let err = classifier.classify("hmm").await.unwrap_err();
        assert!(matches!(err, ControlError::Parse { .. }));
    }

    #[tokio::test]
    async fn model_path_broken_json_is_parse_error() {
        let (classifier, _) = classifier_with(&["{\"intent\": \"x\", \"mode\": }"]);
        let err = classifier.classify("hmm").await.unwrap_err();
        assert!(matches!(err, ControlError::Parse { .. }));
    }

    #[tokio::test]
    async fn model_path_missing_intent_is_validation_error() {
        let (classifier, _) = classifier_with(&["{\"mode\": \"FACTUAL\"}"]);
        let err = classifier.classify("define entropy").await.unwrap_err();
        assert!(matches!(err, ControlError::Validation { .. }));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let generator = Arc::new(ScriptedGenerator::failing());
        let classifier = Classifier::new(generator);
        let err = classifier.classify("who wrote Dune?").await.unwrap_err();
        assert!(matches!(err, ControlError::Inference(_)));
    }

    // ─── Sanitization ───────────────────────────────────────────────────

    #[test]
    fn sanitize_strips_language_tag_and_prose() {
        let clean = sanitize_output("json\nSure! {\"a\": {\"b\": 1}} hope this helps").unwrap();
        assert_eq!(clean, "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn sanitize_without_braces_fails() {
        assert!(matches!(
            sanitize_output("no json here"),
            Err(ControlError::Parse { .. })
        ));
    }
}
