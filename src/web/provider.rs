//! Search provider capability.

use async_trait::async_trait;

use super::errors::WebError;

/// Returns short text snippets for a query, never answers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, WebError>;
}
