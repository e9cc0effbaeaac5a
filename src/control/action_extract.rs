//! Derive a concrete action and target from instruction text.
//!
//! Two entry points share the same keyword tables:
//! - [`action_for_target`] classifies the argument of an explicit action verb
//!   ("Open resume.pdf" → `open_file_path`).
//! - [`extract_action`] recovers an action from the free-text `intent` the
//!   model produced for an ACTION control.
//!
//! The single-dot file rule is deliberately naive: `my.big.file.pdf` has three
//! dots and is treated as an app name, and a dotless name is never a file.

use super::types::ActionKind;

/// Verbs that mark an explicit local action, including the trailing space.
pub const ACTION_VERBS: [&str; 4] = ["open ", "launch ", "run ", "execute "];

const LATEST_TERMS: [&str; 3] = ["latest", "most recent", "newest"];
const DOWNLOAD_TERMS: [&str; 2] = ["download", "file"];
const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Whether lower-cased text asks for the newest downloaded file.
pub fn mentions_latest_download(lower: &str) -> bool {
    LATEST_TERMS.iter().any(|t| lower.contains(t)) && DOWNLOAD_TERMS.iter().any(|t| lower.contains(t))
}

/// Whether `name` looks like `file.ext`: exactly one dot.
pub fn is_single_dot_file(name: &str) -> bool {
    name.matches('.').count() == 1
}

/// Strip trailing sentence punctuation.
pub fn strip_trailing_punctuation(text: &str) -> &str {
    text.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Split `text` into its leading action verb and the rest, case-insensitively.
///
/// Returns `None` when the trimmed text does not start with a known verb.
pub fn split_action_verb(text: &str) -> Option<(&'static str, &str)> {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();
    ACTION_VERBS.iter().find_map(|verb| {
        if lower.starts_with(verb) {
            // Verbs are ASCII so the byte offset is the same in both strings.
            trimmed.get(verb.len()..).map(|rest| (verb.trim_end(), rest))
        } else {
            None
        }
    })
}

/// Pick the action for the argument of an explicit action verb.
///
/// Priority: URL prefix, then latest-download wording (checked against the
/// whole lower-cased intent), then a single-dot file name, else an app.
pub fn action_for_target(target: &str, intent_lower: &str) -> ActionKind {
    if URL_PREFIXES.iter().any(|p| target.starts_with(p)) {
        ActionKind::OpenUrl
    } else if mentions_latest_download(intent_lower) {
        ActionKind::OpenLatestDownload
    } else if target.contains('.') && is_single_dot_file(target) {
        ActionKind::OpenFilePath
    } else {
        ActionKind::OpenApp
    }
}

/// Recover an action/target pair from a model-produced intent string.
///
/// Returns `None` when the intent carries no recognisable action wording, in
/// which case whatever the model supplied is kept.
pub fn extract_action(intent: &str) -> Option<(ActionKind, Option<String>)> {
    let lowered = intent.to_lowercase();
    let lower = strip_trailing_punctuation(&lowered);

    if mentions_latest_download(lower) {
        return Some((ActionKind::OpenLatestDownload, None));
    }

    if lower.contains("open") && lower.contains('.') {
        let target = lower.replace("open", "");
        let target = target.trim();
        if !target.is_empty() && is_single_dot_file(target) {
            return Some((ActionKind::OpenFilePath, Some(target.to_string())));
        }
    }

    if lower.contains("open") || lower.contains("launch") {
        let target = lower.replace("open", "").replace("launch", "");
        let target = target.trim();
        let target = (!target.is_empty()).then(|| target.to_string());
        return Some((ActionKind::OpenApp, target));
    }

    None
}

// ─── Tests ──────────────────────────────────────────────────────────────────
