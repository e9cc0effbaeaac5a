//! The Control record and its enumerations.
//!
//! One `Control` describes one user instruction. It is produced by the
//! classifier, optionally rewritten by the automation combiner, consumed once
//! by the action dispatcher or the generation path, then dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Mode ───────────────────────────────────────────────────────────────────

/// Top-level category of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Factual,
    Opinion,
    Analysis,
    Search,
    NsfwOpenAnalytical,
    Action,
    Automation,
    MemoryGovernance,
    Unknown,
}

impl Mode {
    /// Every valid mode, in schema order.
    pub const ALL: [Mode; 9] = [
        Mode::Factual,
        Mode::Opinion,
        Mode::Analysis,
        Mode::Search,
        Mode::NsfwOpenAnalytical,
        Mode::Action,
        Mode::Automation,
        Mode::MemoryGovernance,
        Mode::Unknown,
    ];

    /// Wire name as the model is asked to emit it.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Factual => "FACTUAL",
            Mode::Opinion => "OPINION",
            Mode::Analysis => "ANALYSIS",
            Mode::Search => "SEARCH",
            Mode::NsfwOpenAnalytical => "NSFW_OPEN_ANALYTICAL",
            Mode::Action => "ACTION",
            Mode::Automation => "AUTOMATION",
            Mode::MemoryGovernance => "MEMORY_GOVERNANCE",
            Mode::Unknown => "UNKNOWN",
        }
    }

    /// Exact, case-sensitive lookup of a wire name.
    pub fn from_wire(raw: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Field Enums ────────────────────────────────────────────────────────────

/// Whether the request is about the real world or a fiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    #[default]
    RealWorld,
    Fictional,
}

impl Context {
    pub fn as_str(self) -> &'static str {
        match self {
            Context::RealWorld => "real_world",
            Context::Fictional => "fictional",
        }
    }
}

/// Register the answer should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Analytical,
    Opinionated,
    Erotic,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Analytical => "analytical",
            Tone::Opinionated => "opinionated",
            Tone::Erotic => "erotic",
        }
    }
}

/// Legality classification of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    #[default]
    Legal,
    Illegal,
}

impl Risk {
    pub fn as_str(self) -> &'static str {
        match self {
            Risk::Legal => "legal",
            Risk::Illegal => "illegal",
        }
    }
}

/// Local side effect requested by an ACTION control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    OpenApp,
    OpenFile,
    OpenUrl,
    OpenFilePath,
    OpenLatestDownload,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::OpenApp => "open_app",
            ActionKind::OpenFile => "open_file",
            ActionKind::OpenUrl => "open_url",
            ActionKind::OpenFilePath => "open_file_path",
            ActionKind::OpenLatestDownload => "open_latest_download",
        }
    }

    /// Parse a wire name; anything unrecognised is `None`.
    pub fn from_wire(raw: &str) -> Option<ActionKind> {
        match raw.trim() {
            "open_app" => Some(ActionKind::OpenApp),
            "open_file" => Some(ActionKind::OpenFile),
            "open_url" => Some(ActionKind::OpenUrl),
            "open_file_path" => Some(ActionKind::OpenFilePath),
            "open_latest_download" => Some(ActionKind::OpenLatestDownload),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Combination Hint ───────────────────────────────────────────────────────

/// Cross-step data recorded when two adjacent automation steps are fused.
///
/// Lives only between the combiner and the dispatcher; never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombinationHint {
    /// `open_app` followed by `open_url`: launch the app with the URL.
    AppWithUrl { app_name: String, url: String },
    /// Known folder followed by a file inside it.
    FolderFile { folder_name: String, file_name: String },
}

// ─── Control ────────────────────────────────────────────────────────────────

/// Canonical classification record for one instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub intent: String,
    pub mode: Mode,
    /// Always within `0..=4`.
    pub explicitness: u8,
    pub context: Context,
    pub web_required: bool,
    pub memory_read: bool,
    pub memory_write: bool,
    pub tone: Tone,
    pub risk: Risk,
    pub action: Option<ActionKind>,
    pub target: Option<String>,
    #[serde(skip)]
    pub hint: Option<CombinationHint>,
}

impl Control {
    /// A control with every field at its neutral default.
    pub fn new(mode: Mode, intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            mode,
            explicitness: 0,
            context: Context::RealWorld,
            web_required: false,
            memory_read: false,
            memory_write: false,
            tone: Tone::Neutral,
            risk: Risk::Legal,
            action: None,
            target: None,
            hint: None,
        }
    }

    /// An ACTION control with the given action and target.
    pub fn action(intent: impl Into<String>, action: ActionKind, target: Option<String>) -> Self {
        Self {
            action: Some(action),
            target,
            ..Self::new(Mode::Action, intent)
        }
    }

    /// The app name to launch: the combined app name when present, else the target.
    pub fn app_name(&self) -> Option<&str> {
        match &self.hint {
            Some(CombinationHint::AppWithUrl { app_name, .. }) => Some(app_name),
            _ => self.target.as_deref(),
        }
    }

    /// The URL carried over from a fused `open_url` step.
    pub fn url_param(&self) -> Option<&str> {
        match &self.hint {
            Some(CombinationHint::AppWithUrl { url, .. }) => Some(url),
            _ => None,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
