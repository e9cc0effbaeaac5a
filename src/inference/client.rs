//! Ollama-compatible text generation client.
//!
//! Sends non-streaming `/api/generate` requests to a local model endpoint and
//! returns the raw completion text. Every call is bounded by the configured
//! timeout; failures surface as `InferenceError` and are never retried here.

use std::time::Duration;

use reqwest::Client as HttpClient;

use super::errors::InferenceError;
use super::types::{GenerateRequest, GenerateResponse, Sampling};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── OllamaClient ────────────────────────────────────────────────────────────

/// Client for the local model endpoint.
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client for `base_url` (e.g. `http://localhost:11434`).
    ///
    /// Does NOT check connectivity; that happens on the first request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InferenceError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// The endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Generation ──────────────────────────────────────────────────────

    /// Generate a completion for `prompt` with the given model and sampling.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        sampling: &Sampling,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest::new(model, prompt, sampling);

        tracing::debug!(
            url = %url,
            model = %body.model,
            prompt_chars = body.prompt.len(),
            temperature = body.options.temperature,
            num_predict = ?body.options.num_predict,
            "llm request"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout {
                        duration_secs: self.timeout.as_secs(),
                    }
                } else {
                    InferenceError::ConnectionFailed {
                        endpoint: url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| InferenceError::MalformedResponse {
                reason: format!("failed to read response body: {e}"),
            })?;

        parse_generate_body(&body_text)
    }

    // ─── Health Check ────────────────────────────────────────────────────

    /// Check whether the endpoint is reachable. Consumes no tokens.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).timeout(CONNECT_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Extract the trimmed `response` text from a non-streaming body.
pub fn parse_generate_body(body: &str) -> Result<String, InferenceError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::MalformedResponse {
            reason: format!("invalid JSON from model endpoint: {e}"),
        })?;

    parsed
        .response
        .map(|text| text.trim().to_string())
        .ok_or_else(|| InferenceError::MalformedResponse {
            reason: format!("unexpected response body: {body}"),
        })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
