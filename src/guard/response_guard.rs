//! Mode-specific post-processing of generated text.
//!
//! Every guard is a total string transform; an empty result is a legitimate
//! outcome (and, for NSFW_OPEN_ANALYTICAL, the retry trigger).

use std::sync::LazyLock;

use regex::Regex;

use crate::control::{Control, Mode};

/// Hedging markers removed from factual answers, each through end of text.
static HEDGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?is)\bI think\b.*",
        r"(?is)\bin my opinion\b.*",
        r"(?is)\bmay be\b.*",
        r"(?is)\bperhaps\b.*",
    ])
});

static OPINION_FRAMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(opinion|believe|think|view)\b").expect("static regex")
});

/// Refusal and policy boilerplate, stripped in this order.
static REFUSAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?is)i'm here to.*",
        r"(?is)i am here to.*",
        r"(?is)my purpose is.*",
        r"(?is)as per.*guidelines.*",
        r"(?is)against.*guidelines.*",
        r"(?is)i cannot.*",
        r"(?is)i can't.*",
        r"(?is)i won't.*",
        r"(?is)i will not.*",
        r"(?is)i do not.*engage.*",
        r"(?is)this is not appropriate.*",
        r"(?is)i am not allowed.*",
        r"(?is)i can help with.*instead.*",
        r"(?is)i can provide.*information.*",
        r"(?is)warning.*",
        r"(?is)illegal.*",
        r"(?is)immoral.*",
    ])
});

const OPINION_PREFIX: &str = "Opinions vary, but ";

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static regex"))
        .collect()
}

// ─── Guard ──────────────────────────────────────────────────────────────────

/// Routes generated text through the guard for the control's mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseGuard;

impl ResponseGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, control: &Control, text: &str) -> String {
        self.apply_mode(control.mode, text)
    }

    /// Modes without a guard pass the trimmed text through.
    pub fn apply_mode(&self, mode: Mode, text: &str) -> String {
        let text = text.trim();
        match mode {
            Mode::Factual => guard_factual(text),
            Mode::Opinion => guard_opinion(text),
            Mode::NsfwOpenAnalytical => guard_nsfw(text),
            _ => text.to_string(),
        }
    }
}

// ─── Guards ─────────────────────────────────────────────────────────────────

/// One sentence, no hedging.
fn guard_factual(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in HEDGE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    first_sentence(cleaned.trim()).to_string()
}

fn guard_opinion(text: &str) -> String {
    if OPINION_FRAMING.is_match(text) {
        text.to_string()
    } else {
        format!("{OPINION_PREFIX}{text}")
    }
}

fn guard_nsfw(text: &str) -> String {
    let mut cleaned = text.to_string();
    let mut found_refusal = false;

    for pattern in REFUSAL_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            found_refusal = true;
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
    }

    if found_refusal {
        tracing::debug!(
            mode = %Mode::NsfwOpenAnalytical,
            reason = "refusal_or_policy_detected",
            "guard stripped response"
        );
    }

    cleaned.trim().to_string()
}

/// Text up to and including the first `.`, `!` or `?` that is followed by
/// whitespace. Text without such a boundary is returned whole.
pub fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return text[..i + c.len_utf8()].trim();
                }
            }
        }
    }
    text.trim()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
