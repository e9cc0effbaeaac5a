//! Repair a raw, model-produced record into a valid `Control`.
//!
//! The model output is treated as untrusted: keys may be missing, values may
//! have the wrong type, and enum fields may contain synonyms or leaked
//! `A|B|C` schema text. Repair runs in a fixed order:
//! defaults → per-field normalization → mode → action extraction → key check.
//!
//! Only a missing `intent` can fail the key check in practice; every other
//! required key is populated by a normalizer.

use serde_json::{Map, Value};

use super::action_extract::extract_action;
use super::errors::ControlError;
use super::types::{ActionKind, Context, Control, Mode, Risk, Tone};

/// Keys every repaired record must carry.
pub const REQUIRED_KEYS: [&str; 9] = [
    "intent",
    "mode",
    "explicitness",
    "context",
    "web_required",
    "memory_read",
    "memory_write",
    "tone",
    "risk",
];

const MAX_EXPLICITNESS: i64 = 4;

// ─── Entry Point ────────────────────────────────────────────────────────────

/// Fill defaults, normalize every field, validate, and build a `Control`.
pub fn repair(mut raw: Map<String, Value>) -> Result<Control, ControlError> {
    apply_defaults(&mut raw);

    let explicitness = normalize_explicitness(raw.get("explicitness"));
    raw.insert("explicitness".into(), Value::from(explicitness));

    let context = normalize_context(raw.get("context"));
    raw.insert("context".into(), Value::from(context.as_str()));

    let tone = normalize_tone(raw.get("tone"));
    raw.insert("tone".into(), Value::from(tone.as_str()));

    let risk = normalize_risk(raw.get("risk"));
    raw.insert("risk".into(), Value::from(risk.as_str()));

    let intent = raw.get("intent").map(value_text);
    let web_required = truthy(raw.get("web_required"));
    let mode = normalize_mode(
        raw.get("mode"),
        intent.as_deref().unwrap_or_default(),
        explicitness,
        web_required,
    );
    raw.insert("mode".into(), Value::from(mode.as_str()));

    let (action, target) = if mode == Mode::Action {
        resolve_action(&raw, intent.as_deref().unwrap_or_default())
    } else {
        (None, None)
    };

    validate_required_keys(&raw)?;

    Ok(Control {
        intent: intent.unwrap_or_default(),
        mode,
        explicitness,
        context,
        web_required,
        memory_read: truthy(raw.get("memory_read")),
        memory_write: truthy(raw.get("memory_write")),
        tone,
        risk,
        action,
        target,
        hint: None,
    })
}

// ─── Defaults ───────────────────────────────────────────────────────────────

fn apply_defaults(raw: &mut Map<String, Value>) {
    let defaults = [
        ("risk", Value::from("legal")),
        ("explicitness", Value::from(0)),
        ("memory_read", Value::Bool(false)),
        ("memory_write", Value::Bool(false)),
        ("web_required", Value::Bool(false)),
        ("action", Value::Null),
        ("target", Value::Null),
    ];
    for (key, value) in defaults {
        raw.entry(key).or_insert(value);
    }
}

// ─── Field Normalizers ──────────────────────────────────────────────────────

/// Coerce to an integer in `0..=4`. Unparsable or out-of-range values become 0.
pub fn normalize_explicitness(value: Option<&Value>) -> u8 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        _ => None,
    };

    match parsed {
        Some(n) if (0..=MAX_EXPLICITNESS).contains(&n) => n as u8,
        Some(n) => {
            tracing::info!(explicitness = n, "explicitness out of range, defaulting to 0");
            0
        }
        None => {
            tracing::info!(raw = ?value, "explicitness parse failed, defaulting to 0");
            0
        }
    }
}

pub fn normalize_context(value: Option<&Value>) -> Context {
    match value.and_then(Value::as_str).map(|s| s.trim().to_lowercase()).as_deref() {
        Some("real" | "real_world" | "static_knowledge" | "general" | "informational") => {
            Context::RealWorld
        }
        Some("fiction" | "fictional") => Context::Fictional,
        _ => Context::RealWorld,
    }
}

pub fn normalize_tone(value: Option<&Value>) -> Tone {
    match value.and_then(Value::as_str).map(|s| s.trim().to_lowercase()).as_deref() {
        Some("" | "neutral" | "objective" | "informational") => Tone::Neutral,
        Some("analytical" | "analysis") => Tone::Analytical,
        Some("opinion" | "opinionated") => Tone::Opinionated,
        Some("erotic") => Tone::Erotic,
        _ => Tone::Neutral,
    }
}

/// Exactly `"legal"` or `"illegal"`; anything else is legal.
pub fn normalize_risk(value: Option<&Value>) -> Risk {
    match value.and_then(Value::as_str) {
        Some("legal") => Risk::Legal,
        Some("illegal") => Risk::Illegal,
        other => {
            tracing::info!(raw = ?other, "invalid risk value, defaulting to legal");
            Risk::Legal
        }
    }
}

/// Clean the raw mode and fall back to inference when it is not a valid mode.
pub fn normalize_mode(
    value: Option<&Value>,
    intent: &str,
    explicitness: u8,
    web_required: bool,
) -> Mode {
    let raw = value.map(value_text).unwrap_or_default();
    let mut cleaned = raw.trim();

    if let Some((head, _)) = cleaned.split_once('|') {
        tracing::info!(raw_mode = %raw, "enum leak detected in mode");
        cleaned = head.trim();
    }

    if cleaned == Mode::Action.as_str() {
        return Mode::Action;
    }

    match Mode::from_wire(cleaned) {
        Some(mode) => mode,
        None => {
            let inferred = infer_mode(intent, explicitness, web_required);
            tracing::info!(raw_mode = %cleaned, inferred = %inferred, "invalid mode, applying fallback");
            inferred
        }
    }
}

/// Fallback chain for a mode the model got wrong.
pub fn infer_mode(intent: &str, explicitness: u8, web_required: bool) -> Mode {
    let intent = intent.to_lowercase();

    if explicitness > 0 {
        Mode::NsfwOpenAnalytical
    } else if intent.contains("opinion") || intent.contains("think") {
        Mode::Opinion
    } else if intent.contains("compare") || intent.contains("analysis") {
        Mode::Analysis
    } else if web_required {
        Mode::Search
    } else {
        Mode::Factual
    }
}

/// Action/target for an ACTION control: extracted from the intent when it
/// carries action wording, otherwise whatever the model supplied.
fn resolve_action(raw: &Map<String, Value>, intent: &str) -> (Option<ActionKind>, Option<String>) {
    let supplied_action = raw
        .get("action")
        .and_then(Value::as_str)
        .and_then(ActionKind::from_wire);
    let supplied_target = raw
        .get("target")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    match extract_action(intent) {
        Some((ActionKind::OpenLatestDownload, _)) => (Some(ActionKind::OpenLatestDownload), None),
        Some((action, Some(target))) => (Some(action), Some(target)),
        Some((action, None)) => (Some(action), supplied_target),
        None => (supplied_action, supplied_target),
    }
}

// ─── Validation ─────────────────────────────────────────────────────────────

fn validate_required_keys(raw: &Map<String, Value>) -> Result<(), ControlError> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !raw.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ControlError::Validation { missing })
    }
}

// ─── Value Helpers ──────────────────────────────────────────────────────────

/// Render a JSON scalar as text (strings unquoted).
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Boolean coercion for model output that sometimes quotes booleans.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn explicitness_coercion_and_range() {
        let cases = [
            (json!(-5), 0),
            (json!(0), 0),
            (json!(4), 4),
            (json!(9), 0),
            (json!("abc"), 0),
            (json!("3"), 3),
            (json!(2.7), 2),
            (json!(null), 0),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_explicitness(Some(&input)), expected, "input {input}");
        }
        assert_eq!(normalize_explicitness(None), 0);
    }

    #[test]
    fn context_synonyms() {
        assert_eq!(normalize_context(Some(&json!("static_knowledge"))), Context::RealWorld);
        assert_eq!(normalize_context(Some(&json!("fiction"))), Context::Fictional);
        assert_eq!(normalize_context(Some(&json!("fantasy"))), Context::RealWorld);
        assert_eq!(normalize_context(None), Context::RealWorld);
    }

    #[test]
    fn tone_synonyms() {
        assert_eq!(normalize_tone(Some(&json!("objective"))), Tone::Neutral);
        assert_eq!(normalize_tone(Some(&json!("analysis"))), Tone::Analytical);
        assert_eq!(normalize_tone(Some(&json!("opinion"))), Tone::Opinionated);
        assert_eq!(normalize_tone(Some(&json!("erotic"))), Tone::Erotic);
        assert_eq!(normalize_tone(Some(&json!(""))), Tone::Neutral);
        assert_eq!(normalize_tone(Some(&json!("sarcastic"))), Tone::Neutral);
    }

    #[test]
    fn risk_is_strict() {
        assert_eq!(normalize_risk(Some(&json!("illegal"))), Risk::Illegal);
        assert_eq!(normalize_risk(Some(&json!("ILLEGAL"))), Risk::Legal);
        assert_eq!(normalize_risk(Some(&json!("risky"))), Risk::Legal);
    }

    #[test]
    fn mode_enum_leak_keeps_text_before_pipe() {
        let mode = normalize_mode(Some(&json!("OPINION|FACTUAL|ANALYSIS")), "", 0, false);
        assert_eq!(mode, Mode::Opinion);

        let mode = normalize_mode(Some(&json!(" ACTION | AUTOMATION")), "", 0, false);
        assert_eq!(mode, Mode::Action);
    }

    #[test]
    fn mode_inference_chain() {
        assert_eq!(infer_mode("anything", 2, true), Mode::NsfwOpenAnalytical);
        assert_eq!(infer_mode("What do you THINK", 0, true), Mode::Opinion);
        assert_eq!(infer_mode("compare phones", 0, true), Mode::Analysis);
        assert_eq!(infer_mode("weather", 0, true), Mode::Search);
        assert_eq!(infer_mode("definition", 0, false), Mode::Factual);
    }

    #[test]
    fn invalid_mode_uses_inference() {
        let control = repair(record(json!({
            "intent": "compare",
            "mode": "COMPARISON",
            "context": "general",
            "tone": "analysis",
        })))
        .unwrap();
        assert_eq!(control.mode, Mode::Analysis);
        assert_eq!(control.tone, Tone::Analytical);
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let control = repair(record(json!({"intent": "define entropy", "mode": "FACTUAL"}))).unwrap();
        assert_eq!(control.mode, Mode::Factual);
        assert_eq!(control.explicitness, 0);
        assert_eq!(control.risk, Risk::Legal);
        assert_eq!(control.context, Context::RealWorld);
        assert_eq!(control.tone, Tone::Neutral);
        assert!(!control.web_required && !control.memory_read && !control.memory_write);
        assert_eq!(control.action, None);
        assert_eq!(control.target, None);
    }

    #[test]
    fn missing_intent_fails_validation() {
        let err = repair(record(json!({"mode": "FACTUAL"}))).unwrap_err();
        match err {
            ControlError::Validation { missing } => assert_eq!(missing, vec!["intent".to_string()]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_values_are_repaired() {
        let control = repair(record(json!({
            "intent": 42,
            "mode": null,
            "explicitness": "very",
            "context": ["nested"],
            "web_required": "true",
            "memory_read": 1,
            "memory_write": "no",
            "tone": {"a": 1},
            "risk": false,
            "unexpected": "key",
        })))
        .unwrap();
        assert_eq!(control.intent, "42");
        assert_eq!(control.mode, Mode::Search);
        assert_eq!(control.explicitness, 0);
        assert!(control.web_required);
        assert!(control.memory_read);
        assert!(!control.memory_write);
    }

    #[test]
    fn action_mode_extracts_file_path() {
        let control = repair(record(json!({
            "intent": "Open resume.pdf",
            "mode": "ACTION",
        })))
        .unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenFilePath));
        assert_eq!(control.target.as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn action_mode_latest_download_clears_target() {
        let control = repair(record(json!({
            "intent": "open the latest download",
            "mode": "ACTION",
            "target": "downloads",
        })))
        .unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenLatestDownload));
        assert_eq!(control.target, None);
    }

    #[test]
    fn action_mode_keeps_model_action_without_wording() {
        let control = repair(record(json!({
            "intent": "browse",
            "mode": "ACTION",
            "action": "open_url",
            "target": "https://example.com",
        })))
        .unwrap();
        assert_eq!(control.action, Some(ActionKind::OpenUrl));
        assert_eq!(control.target.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn action_mode_dead_end_has_no_action() {
        let control = repair(record(json!({"intent": "do the thing", "mode": "ACTION"}))).unwrap();
        assert_eq!(control.mode, Mode::Action);
        assert_eq!(control.action, None);
    }

    #[test]
    fn non_action_modes_drop_action_fields() {
        let control = repair(record(json!({
            "intent": "facts",
            "mode": "FACTUAL",
            "action": "open_app",
            "target": "chrome",
        })))
        .unwrap();
        assert_eq!(control.action, None);
        assert_eq!(control.target, None);
    }
}
