//! Typed errors for the crawl pipeline.
//!
//! Extraction and aggregation never fail; errors only come from the edges:
//! fetching pages, loading configuration and writing outputs.

use thiserror::Error;

/// A heading verb outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// Errors that can occur while fetching a documentation page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Body exceeded the configured size limit
    #[error("response too large: more than {limit} bytes")]
    TooLarge { limit: usize },

    /// No page registered for this URL (static fetcher)
    #[error("page not found: {0}")]
    NotFound(String),
}

/// Errors that can occur while loading crawl configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors that can occur while persisting endpoint records.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
