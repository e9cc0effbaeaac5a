//! Inference: text generation against a local Ollama-compatible endpoint.
//!
//! - `client`: HTTP client for `/api/generate`
//! - `generator`: the `TextGenerator` capability and per-model handles
//! - `types`: request/response wire types and sampling profiles
//! - `errors`: inference error taxonomy

pub mod client;
pub mod errors;
pub mod generator;
pub mod types;

pub use client::OllamaClient;
pub use errors::InferenceError;
pub use generator::{ModelHandle, TextGenerator};
pub use types::Sampling;
