//! Decides whether to search and turns results into prompt context.

use std::sync::Arc;

use super::formatter::format_for_prompt;
use super::provider::SearchProvider;
use crate::config::WebConfig;
use crate::control::Control;

pub struct WebSearch {
    provider: Arc<dyn SearchProvider>,
    enabled: bool,
    max_sources: usize,
}

impl WebSearch {
    pub fn new(provider: Arc<dyn SearchProvider>, config: &WebConfig) -> Self {
        Self {
            provider,
            enabled: config.enabled,
            max_sources: config.max_sources,
        }
    }

    /// Formatted web context, or `None` when the turn does not need the web,
    /// search is disabled, the provider fails, or nothing was found.
    pub async fn run(&self, control: &Control, query: &str) -> Option<String> {
        if !control.web_required || !self.enabled {
            return None;
        }

        let results = match self.provider.search(query, self.max_sources).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "web search failed");
                return None;
            }
        };

        if results.is_empty() {
            tracing::info!("web search returned no results");
            return None;
        }

        tracing::info!(sources_count = results.len(), "web results ready");
        Some(format_for_prompt(&results, chrono::Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Mode;
    use crate::test_support::StaticSearch;

    fn search_control() -> Control {
        let mut control = Control::new(Mode::Search, "search");
        control.web_required = true;
        control
    }

    #[tokio::test]
    async fn skipped_when_not_required() {
        let provider = Arc::new(StaticSearch::new(&["x"]));
        let web = WebSearch::new(provider.clone(), &WebConfig::default());
        assert_eq!(web.run(&Control::new(Mode::Factual, "q"), "q").await, None);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn skipped_when_disabled() {
        let provider = Arc::new(StaticSearch::new(&["x"]));
        let config = WebConfig {
            enabled: false,
            ..WebConfig::default()
        };
        let web = WebSearch::new(provider.clone(), &config);
        assert_eq!(web.run(&search_control(), "q").await, None);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn formats_capped_results() {
        let provider = Arc::new(StaticSearch::new(&["a", "b", "c"]));
        let config = WebConfig {
            max_sources: 2,
            ..WebConfig::default()
        };
        let web = WebSearch::new(provider, &config);
        let text = web.run(&search_control(), "latest news").await.unwrap();
        assert!(text.starts_with("[Web search results | fetched "));
        assert!(text.ends_with("\n- a\n- b"));
    }

    #[tokio::test]
    async fn provider_failure_yields_none() {
        let web = WebSearch::new(Arc::new(StaticSearch::failing()), &WebConfig::default());
        assert_eq!(web.run(&search_control(), "q").await, None);
    }

    #[tokio::test]
    async fn empty_results_yield_none() {
        let web = WebSearch::new(Arc::new(StaticSearch::new(&[])), &WebConfig::default());
        assert_eq!(web.run(&search_control(), "q").await, None);
    }
}
