//! Inference error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Structured logging
//! is the caller's responsibility; these types carry the upstream status and
//! text so a log line or user message can be built from them.

use thiserror::Error;

/// Errors that can occur while asking the model endpoint for text.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// TCP/HTTP connection to the model endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// The model endpoint did not respond within the configured timeout.
    #[error("inference timeout after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// Non-2xx HTTP response from the model endpoint.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The endpoint answered 2xx but the body was not the expected shape.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Client construction failed.
    #[error("config error: {reason}")]
    ConfigError { reason: String },
}

impl InferenceError {
    /// Whether the failure came from the transport rather than the model.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            InferenceError::ConnectionFailed { .. } | InferenceError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_embeds_status_and_body() {
        let err = InferenceError::HttpError {
            status: 404,
            body: "model 'phi3:mini' not found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: model 'phi3:mini' not found");
    }

    #[test]
    fn unreachable_covers_transport_failures_only() {
        assert!(InferenceError::Timeout { duration_secs: 5 }.is_unreachable());
        assert!(InferenceError::ConnectionFailed {
            endpoint: "http://localhost:11434".into(),
            reason: "refused".into(),
        }
        .is_unreachable());
        assert!(!InferenceError::HttpError {
            status: 500,
            body: String::new(),
        }
        .is_unreachable());
        assert!(!InferenceError::MalformedResponse {
            reason: "missing response".into(),
        }
        .is_unreachable());
    }
}
