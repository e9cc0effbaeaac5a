//! Web: optional search context for time-sensitive questions.
//!
//! - `provider`: the `SearchProvider` capability
//! - `duckduckgo`: HTML endpoint provider
//! - `formatter`: prompt context block
//! - `manager`: `WebSearch`, which decides whether to search at all
//! - `errors`: provider failures

pub mod duckduckgo;
pub mod errors;
pub mod formatter;
pub mod manager;
pub mod provider;

pub use duckduckgo::DuckDuckGoProvider;
pub use errors::WebError;
pub use manager::WebSearch;
pub use provider::SearchProvider;
