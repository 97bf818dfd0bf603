//! Live HTTP fetching. Gated behind the "fetch" feature flag.

use super::{FetchConfig, FetchError, PageFetcher};
use reqwest::blocking::{Client, Response};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Blocking HTTP fetcher with one cookie-carrying client per session id.
pub struct HttpFetcher {
    config: FetchConfig,
    sessions: HashMap<String, Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    fn client(&mut self, session_id: &str) -> Result<&Client, FetchError> {
        if !self.sessions.contains_key(session_id) {
            let cookie_store = Arc::new(reqwest::cookie::Jar::default());
            let client = Client::builder()
                .user_agent(&self.config.user_agent)
                .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
                .cookie_provider(cookie_store)
                .build()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            debug!(session_id, "opened fetch session");
            self.sessions.insert(session_id.to_string(), client);
        }
        self.sessions
            .get(session_id)
            .ok_or_else(|| FetchError::Network(format!("session {} unavailable", session_id)))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&mut self, url: &str, session_id: &str) -> Result<String, FetchError> {
        let parsed_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed_url.scheme()
            )));
        }

        let bypass_cache = self.config.bypass_cache;
        let limit = self.config.max_response_bytes;
        let client = self.client(session_id)?;

        let mut request = client.get(parsed_url.as_str());
        if bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }
        let response = request
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        read_response_text_limited(response, limit)
    }
}

fn read_response_text_limited(mut response: Response, limit: usize) -> Result<String, FetchError> {
    let mut body = Vec::new();
    (&mut response)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| FetchError::Network(e.to_string()))?;
    if body.len() > limit {
        return Err(FetchError::TooLarge { limit });
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
