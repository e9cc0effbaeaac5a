//! Test doubles for the capability traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::actions::errors::ActionError;
use crate::actions::launcher::{LaunchRequest, Launcher};
use crate::inference::{InferenceError, TextGenerator};
use crate::web::errors::WebError;
use crate::web::provider::SearchProvider;

// ─── Generator ──────────────────────────────────────────────────────────────

/// Replays canned responses in order, repeating the last one.
pub struct ScriptedGenerator {
    responses: Vec<String>,
    fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|s| s.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the endpoint were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail {
            return Err(InferenceError::ConnectionFailed {
                endpoint: "http://localhost:11434".into(),
                reason: "connection refused".into(),
            });
        }

        let idx = n.min(self.responses.len().saturating_sub(1));
        self.responses
            .get(idx)
            .cloned()
            .ok_or_else(|| InferenceError::MalformedResponse {
                reason: "no scripted response".into(),
            })
    }
}

// ─── Launcher ───────────────────────────────────────────────────────────────

/// Records launch requests instead of spawning anything.
#[derive(Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<LaunchRequest>>,
    fail: bool,
    fail_program: Option<String>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every launch fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Only launches of `program` fail; everything else is recorded.
    pub fn failing_on(program: &str) -> Self {
        Self {
            fail_program: Some(program.to_string()),
            ..Self::default()
        }
    }

    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.launched.lock().unwrap().clone()
    }

    fn should_fail(&self, request: &LaunchRequest) -> bool {
        match (&self.fail_program, request) {
            (Some(name), LaunchRequest::Program { program, .. }) => program == name,
            _ => self.fail,
        }
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError> {
        if self.should_fail(request) {
            return Err(ActionError::LaunchFailed {
                command: request.describe(),
                reason: "spawn refused".into(),
            });
        }
        self.launched.lock().unwrap().push(request.clone());
        Ok(())
    }
}

// ─── Search provider ────────────────────────────────────────────────────────

/// Returns fixed snippets, or fails when constructed with `failing()`.
pub struct StaticSearch {
    snippets: Vec<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticSearch {
    pub fn new(snippets: &[&str]) -> Self {
        Self {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<String>, WebError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WebError::RequestFailed {
                reason: "network unreachable".into(),
            });
        }
        Ok(self.snippets.iter().take(max_results).cloned().collect())
    }
}

// ─── Memory ─────────────────────────────────────────────────────────────────

/// A memory manager over a fresh in-memory database.
pub fn in_memory_manager() -> std::sync::Arc<crate::memory::MemoryManager> {
    let store = crate::memory::MemoryStore::open(":memory:").unwrap();
    std::sync::Arc::new(crate::memory::MemoryManager::new(
        store,
        &crate::config::MemoryConfig::default(),
    ))
}
