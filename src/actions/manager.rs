//! Action dispatcher: executes one ACTION control against the allowlist.
//!
//! Refusals are returned as `Ok` text for the user. Only a failed spawn or a
//! filesystem error is an `Err`, which stops an automation run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::allowlist::Allowlist;
use super::errors::ActionError;
use super::launcher::{LaunchRequest, Launcher};
use crate::control::{ActionKind, CombinationHint, Control};
use crate::memory::MemoryManager;

pub struct ActionManager {
    enabled: bool,
    allowlist: Allowlist,
    launcher: Arc<dyn Launcher>,
    habits: Option<Arc<MemoryManager>>,
}

impl ActionManager {
    pub fn new(enabled: bool, allowlist: Allowlist, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            enabled,
            allowlist,
            launcher,
            habits: None,
        }
    }

    /// Record successful actions as habits.
    pub fn with_habits(mut self, memory: Arc<MemoryManager>) -> Self {
        self.habits = Some(memory);
        self
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    /// Execute one control, returning a user-facing result line.
    pub fn run(&self, control: &Control) -> Result<String, ActionError> {
        if !self.enabled {
            tracing::warn!("actions disabled");
            return Ok("Local actions are disabled.".into());
        }

        let Some(action) = control.action else {
            tracing::error!(action_target = ?control.target, "action missing");
            return Ok("No action detected. Please try again.".into());
        };

        let target = control
            .target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let target = match (action, target) {
            (ActionKind::OpenLatestDownload, _) => target.unwrap_or_default(),
            (_, Some(target)) => target,
            (_, None) => {
                tracing::error!(action = %action, "action target missing");
                return Ok(format!(
                    "I didn't catch what you want to {action}. Please try again."
                ));
            }
        };

        match action {
            ActionKind::OpenApp => self.open_app(control),
            ActionKind::OpenFile => self.open_file(target),
            ActionKind::OpenUrl => self.open_url(target),
            ActionKind::OpenFilePath => self.open_file_path(control, target),
            ActionKind::OpenLatestDownload => self.open_latest_download(),
        }
    }

    // ─── Actions ────────────────────────────────────────────────────────

    fn open_app(&self, control: &Control) -> Result<String, ActionError> {
        let app_name = control.app_name().unwrap_or_default().trim();
        let url = control.url_param();

        if let Some(command) = self.allowlist.app_command(app_name) {
            let request = LaunchRequest::from_command_line(command, url).ok_or_else(|| {
                ActionError::LaunchFailed {
                    command: command.to_string(),
                    reason: "empty command line".into(),
                }
            })?;
            self.launcher.launch(&request)?;
            self.record(&format!("action.open_app.{}", app_name.to_lowercase()));

            return Ok(match url {
                Some(url) => {
                    tracing::info!(app = app_name, url, "opened app with url");
                    format!("Opened {app_name} with {url}.")
                }
                None => {
                    tracing::info!(app = app_name, "opened app");
                    format!("Opened {app_name}.")
                }
            });
        }

        // "Open Downloads" opens the folder itself.
        if let Some(folder) = self.allowlist.folder(app_name) {
            self.launcher
                .launch(&LaunchRequest::open(folder.display().to_string()))?;
            self.record(&format!("action.open_folder.{}", app_name.to_lowercase()));
            tracing::info!(folder = app_name, "opened folder");
            return Ok(format!("Opened {app_name}."));
        }

        tracing::warn!(app = app_name, "app not allowed");
        Ok(format!("I can't open '{app_name}'. It's not in my allowed list."))
    }

    fn open_file(&self, target: &str) -> Result<String, ActionError> {
        self.launcher.launch(&LaunchRequest::open(target))?;
        tracing::info!(file = target, "opened file");
        Ok("Opened file.".into())
    }

    fn open_url(&self, target: &str) -> Result<String, ActionError> {
        let url = normalize_url(target);
        if !self.allowlist.is_url_allowed(&url) {
            tracing::warn!(url = %url, "url scheme not allowed");
            return Ok("I can only open http:// or https:// links.".into());
        }
        self.launcher.launch(&LaunchRequest::open(url.clone()))?;
        tracing::info!(url = %url, "opened url");
        Ok("Opened URL.".into())
    }

    fn open_file_path(&self, control: &Control, target: &str) -> Result<String, ActionError> {
        let path = Path::new(target);

        if !path.exists() {
            tracing::warn!(file = target, "file not found");
            return Ok(format!("File '{target}' not found."));
        }
        if !self.allowlist.is_file_allowed(path) {
            tracing::warn!(file = target, "file type not allowed");
            return Ok(format!(
                "File type not allowed. Allowed types: {}",
                self.allowlist.extensions().join(", ")
            ));
        }

        self.launcher
            .launch(&LaunchRequest::open(path.display().to_string()))?;

        if let Some(CombinationHint::FolderFile {
            folder_name,
            file_name,
        }) = &control.hint
        {
            self.record(&format!("action.open_folder.{}", folder_name.to_lowercase()));
            self.record("action.open_file");
            tracing::info!(folder = %folder_name, file = %file_name, "opened file from folder");
            return Ok(format!("Opened {file_name} from {folder_name}."));
        }

        self.record("action.open_file");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string());
        tracing::info!(file = target, "opened file path");
        Ok(format!("Opened {name}."))
    }

    fn open_latest_download(&self) -> Result<String, ActionError> {
        let Some(downloads) = self.allowlist.folder("downloads").filter(|p| p.is_dir()) else {
            tracing::warn!("downloads folder not found");
            return Ok("Downloads folder not found".into());
        };

        let Some(latest) = latest_file_in(downloads)? else {
            tracing::warn!(folder = %downloads.display(), "downloads folder empty");
            return Ok("No files in Downloads folder".into());
        };

        if !self.allowlist.is_file_allowed(&latest) {
            let ext = latest
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            tracing::warn!(file = %latest.display(), "latest download type not allowed");
            return Ok(format!(
                "Latest file type not allowed. File type {ext} is not allowed to open"
            ));
        }

        self.launcher
            .launch(&LaunchRequest::open(latest.display().to_string()))?;
        self.record("action.open_latest_download");
        tracing::info!(file = %latest.display(), "opened latest download");
        Ok("Opened latest download.".into())
    }

    /// Habit failures are logged, never surfaced.
    fn record(&self, event: &str) {
        if let Some(memory) = &self.habits {
            if let Err(e) = memory.record_habit(event) {
                tracing::warn!(event, error = %e, "habit not recorded");
            }
        }
    }
}

/// `www.` links get an https scheme; everything else is left alone.
pub fn normalize_url(target: &str) -> String {
    if target.to_lowercase().starts_with("www.") {
        format!("https://{target}")
    } else {
        target.to_string()
    }
}

/// Most recently modified regular file directly inside `dir`.
pub fn latest_file_in(dir: &Path) -> Result<Option<PathBuf>, ActionError> {
    let io_err = |e: std::io::Error| ActionError::Io {
        path: dir.display().to_string(),
        reason: e.to_string(),
    };

    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let meta = entry.metadata().map_err(io_err)?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().map_err(io_err)?;
        if latest.as_ref().map_or(true, |(t, _)| modified > *t) {
            latest = Some((modified, entry.path()));
        }
    }
    Ok(latest.map(|(_, path)| path))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
