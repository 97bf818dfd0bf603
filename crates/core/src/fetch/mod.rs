//! Page fetching behind a small trait, so the crawl loop never depends on
//! how HTML is obtained.

#[cfg(feature = "fetch")]
mod http;

#[cfg(feature = "fetch")]
pub use http::HttpFetcher;

pub use crate::error::FetchError;

use std::collections::HashMap;

/// Anything that can turn a URL into page HTML.
///
/// `session_id` groups requests that should share state (cookies) so a run
/// looks like one browsing session to the documentation host.
pub trait PageFetcher {
    fn fetch(&mut self, url: &str, session_id: &str) -> Result<String, FetchError>;
}

/// Configuration for page fetching.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Responses larger than this are rejected.
    pub max_response_bytes: usize,
    /// Ask intermediaries for a fresh copy instead of a cached one.
    pub bypass_cache: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            max_response_bytes: 8 * 1024 * 1024,
            bypass_cache: true,
        }
    }
}

/// Serves pages from memory. Used for offline runs over saved HTML.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Vec<String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&mut self, url: &str, _session_id: &str) -> Result<String, FetchError> {
        self.requests.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}
