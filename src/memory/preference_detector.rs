//! Explicit preference statements ("I prefer chrome", "keep it brief").
//!
//! Matching is a case-insensitive substring test against a fixed table; the
//! first entry that matches wins.

/// A preference extracted from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    pub key: &'static str,
    pub value: &'static str,
    pub trigger: &'static str,
}

/// (trigger phrase, preference key, value)
const PREFERENCE_TABLE: [(&str, &str, &str); 20] = [
    ("prefer chrome", "preferred_browser", "chrome"),
    ("prefer firefox", "preferred_browser", "firefox"),
    ("prefer opera", "preferred_browser", "opera"),
    ("prefer edge", "preferred_browser", "edge"),
    ("always use chrome", "preferred_browser", "chrome"),
    ("always use firefox", "preferred_browser", "firefox"),
    ("always use opera", "preferred_browser", "opera"),
    ("always use edge", "preferred_browser", "edge"),
    ("enable voice", "voice_enabled", "true"),
    ("disable voice", "voice_enabled", "false"),
    ("use voice", "voice_enabled", "true"),
    ("no voice", "voice_enabled", "false"),
    ("prefer short answers", "answer_length", "short"),
    ("prefer long answers", "answer_length", "long"),
    ("prefer detailed", "answer_length", "detailed"),
    ("keep it brief", "answer_length", "short"),
    ("prefer downloads", "preferred_folder", "downloads"),
    ("use downloads", "preferred_folder", "downloads"),
    ("prefer documents", "preferred_folder", "documents"),
    ("use documents", "preferred_folder", "documents"),
];

/// Find the first preference statement in `input`.
pub fn detect(input: &str) -> Option<Preference> {
    let lower = input.trim().to_lowercase();
    let &(trigger, key, value) = PREFERENCE_TABLE
        .iter()
        .find(|(trigger, _, _)| lower.contains(trigger))?;

    tracing::info!(trigger, key, value, "preference detected");
    Some(Preference {
        key,
        value,
        trigger,
    })
}
