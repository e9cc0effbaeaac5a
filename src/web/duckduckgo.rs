//! DuckDuckGo HTML endpoint provider.
//!
//! Fetches `https://duckduckgo.com/html/?q=…` and collects the text of every
//! `.result__snippet` element: whitespace collapsed, duplicates dropped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use scraper::{Html, Selector};

use super::errors::WebError;
use super::provider::SearchProvider;

const SEARCH_URL: &str = "https://duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (deskmate)";
const SNIPPET_SELECTOR: &str = ".result__snippet";

pub struct DuckDuckGoProvider {
    http: HttpClient,
}

impl DuckDuckGoProvider {
    pub fn new(timeout: Duration) -> Result<Self, WebError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WebError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, WebError> {
        tracing::info!(provider = "ddg", query_length = query.len(), "web search");

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| WebError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebError::HttpError {
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| WebError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        extract_snippets(&html, max_results)
    }
}

/// Unique snippet texts in document order, at most `max_results`.
///
/// Text includes nested elements; character references are decoded by the
/// HTML parser.
pub fn extract_snippets(html: &str, max_results: usize) -> Result<Vec<String>, WebError> {
    let selector = Selector::parse(SNIPPET_SELECTOR).map_err(|e| WebError::ParseFailed {
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(html);

    let mut snippets: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        if snippets.len() >= max_results {
            break;
        }
        let text = collapse_whitespace(&element.text().collect::<String>());
        if !text.is_empty() && !snippets.contains(&text) {
            snippets.push(text);
        }
    }
    Ok(snippets)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
