//! What local actions may touch.
//!
//! Apps, folders and file extensions are looked up case-insensitively. The
//! built-in entries cover common browsers and editors plus the platform's
//! well-known user folders; config entries extend or override them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{expand_tilde, ActionsConfig};

/// URL schemes `open_url` accepts.
pub const ALLOWED_URL_SCHEMES: [&str; 2] = ["http://", "https://"];

const DEFAULT_APPS: [(&str, &str); 11] = [
    ("chrome", "chrome"),
    ("google chrome", "chrome"),
    ("edge", "msedge"),
    ("microsoft edge", "msedge"),
    ("firefox", "firefox"),
    ("vscode", "code"),
    ("vs code", "code"),
    ("visual studio code", "code"),
    ("spotify", "spotify"),
    ("opera", "opera"),
    ("terminal", "x-terminal-emulator"),
];

#[derive(Debug, Clone)]
pub struct Allowlist {
    apps: HashMap<String, String>,
    folders: HashMap<String, PathBuf>,
    extensions: Vec<String>,
}

impl Allowlist {
    /// Built-in entries merged with the configured ones.
    pub fn from_config(config: &ActionsConfig) -> Self {
        let mut list = Self::builtin();

        for (name, command) in &config.apps {
            list.apps.insert(name.to_lowercase(), command.clone());
        }
        for (name, path) in &config.folders {
            list.folders
                .insert(name.to_lowercase(), PathBuf::from(expand_tilde(path)));
        }
        list.extensions = config
            .file_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();

        list
    }

    /// Only the built-in entries.
    pub fn builtin() -> Self {
        let apps = DEFAULT_APPS
            .iter()
            .map(|(name, cmd)| (name.to_string(), cmd.to_string()))
            .collect();

        let mut folders = HashMap::new();
        let known = [
            ("downloads", dirs::download_dir()),
            ("documents", dirs::document_dir()),
            ("pictures", dirs::picture_dir()),
            ("desktop", dirs::desktop_dir()),
        ];
        for (name, path) in known {
            if let Some(path) = path {
                folders.insert(name.to_string(), path);
            }
        }

        Self {
            apps,
            folders,
            extensions: ActionsConfig::default().file_extensions,
        }
    }

    /// An empty allowlist; entries are added with the `with_*` builders.
    pub fn empty() -> Self {
        Self {
            apps: HashMap::new(),
            folders: HashMap::new(),
            extensions: Vec::new(),
        }
    }

    pub fn with_app(mut self, name: &str, command: &str) -> Self {
        self.apps.insert(name.to_lowercase(), command.to_string());
        self
    }

    pub fn with_folder(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.folders.insert(name.to_lowercase(), path.into());
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
        self
    }

    // ─── Lookups ─────────────────────────────────────────────────────────

    pub fn is_app_allowed(&self, name: &str) -> bool {
        self.app_command(name).is_some()
    }

    /// Command line registered for an app name.
    pub fn app_command(&self, name: &str) -> Option<&str> {
        self.apps.get(&name.trim().to_lowercase()).map(String::as_str)
    }

    /// Path of a known folder. A trailing " folder" is ignored, so
    /// "Downloads folder" resolves like "downloads".
    pub fn folder(&self, name: &str) -> Option<&Path> {
        let key = name.trim().to_lowercase();
        let key = key.strip_suffix(" folder").unwrap_or(&key);
        self.folders.get(key).map(PathBuf::as_path)
    }

    /// Whether the file's extension is on the list.
    pub fn is_file_allowed(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = format!(".{}", ext.to_lowercase());
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// Allowed extensions, for user-facing messages.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_url_allowed(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        ALLOWED_URL_SCHEMES.iter().any(|s| lower.starts_with(s))
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lower-case with a single leading dot.
fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim().trim_start_matches('.').to_lowercase())
}
