//! Wire types for the Ollama `/api/generate` endpoint.

use serde::{Deserialize, Serialize};

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    /// Upper bound on generated tokens (`num_predict`).
    pub max_tokens: Option<u32>,
}

impl Sampling {
    /// Low-temperature settings used for classification.
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            max_tokens: Some(512),
        }
    }

    /// Settings used for free-form answers.
    pub fn conversational() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: Some(1024),
        }
    }
}

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

/// Per-request model options.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl GenerateRequest {
    pub fn new(model: &str, prompt: &str, sampling: &Sampling) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                num_predict: sampling.max_tokens,
            },
        }
    }
}

/// The subset of the non-streaming response we read.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: Option<String>,
}
