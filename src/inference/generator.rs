//! Text generation capability.
//!
//! The classifier and the retry orchestrator only need "prompt in, text out".
//! `TextGenerator` is that seam; `ModelHandle` binds the HTTP client to one
//! model and one sampling profile.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::OllamaClient;
use super::errors::InferenceError;
use super::types::Sampling;

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

/// A specific model on a shared client.
pub struct ModelHandle {
    client: Arc<OllamaClient>,
    model: String,
    sampling: Sampling,
}

impl ModelHandle {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>, sampling: Sampling) -> Self {
        Self {
            client,
            model: model.into(),
            sampling,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ModelHandle {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.client
            .generate(&self.model, prompt, &self.sampling)
            .await
    }
}
