//! Client configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_EXPLORER_URL, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};

/// Settings shared by the transport, the retry loop and link rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root including `/api/v1`, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Delay before the first retry; doubled for each further attempt.
    pub retry_base_delay: Duration,
    /// Block explorer root used for transaction links.
    pub explorer_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `STABLEPAY_*` variables, keeping defaults for anything missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("STABLEPAY_API_URL").unwrap_or(defaults.base_url);
        let timeout_ms: u64 = std::env::var("STABLEPAY_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let retry_ms: u64 = std::env::var("STABLEPAY_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_MS);
        let explorer_url =
            std::env::var("STABLEPAY_EXPLORER_URL").unwrap_or(defaults.explorer_url);

        Self::default()
            .with_base_url(&base_url)
            .with_explorer_url(&explorer_url)
            .with_request_timeout(Duration::from_millis(timeout_ms))
            .with_retry_base_delay(Duration::from_millis(retry_ms))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_explorer_url(mut self, explorer_url: &str) -> Self {
        self.explorer_url = explorer_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
