//! Web search error types.

use thiserror::Error;

/// Errors from a search provider. The search manager logs these and carries
/// on without web context.
#[derive(Debug, Error)]
pub enum WebError {
    /// Request could not be sent or the body could not be read.
    #[error("search request failed: {reason}")]
    RequestFailed { reason: String },

    /// The result page could not be parsed.
    #[error("search result parse failed: {reason}")]
    ParseFailed { reason: String },

    /// Non-2xx response from the provider.
    #[error("search provider returned HTTP {status}")]
    HttpError { status: u16 },
}
