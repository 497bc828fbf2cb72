//! Configuration with sensible defaults.
//!
//! [`TypeaheadConfig`] tunes the debounce controller and the fulfillment
//! pipeline. [`HttpIndexConfig`] and [`HttpSummaryConfig`] describe the two
//! remote collaborators when the bundled HTTP clients are used.

use std::time::Duration;

use url::Url;

use crate::error::SearchError;

/// Default quiet interval before an attempt fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default per-request HTTP timeout for the bundled clients.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

/// Configuration for the debounce controller and pipeline.
#[derive(Debug, Clone)]
pub struct TypeaheadConfig {
    /// Quiet interval in milliseconds; rapid `set_query` calls inside it
    /// collapse into one attempt.
    pub debounce_ms: u64,
    /// Upper bound on each summary lookup. A lookup exceeding it counts as a
    /// failed resolution for that identifier only. `None` waits indefinitely.
    pub resolve_timeout_ms: Option<u64>,
    /// Maximum number of distinct required terms sent to the index.
    /// `None` sends every term.
    pub max_query_terms: Option<usize>,
    /// Maximum combined byte length of the required terms sent to the index.
    /// Terms past the budget are dropped. `None` sends every term.
    pub max_query_bytes: Option<usize>,
    /// Drop the in-flight pipeline of a superseded attempt instead of letting
    /// it run to completion. Either way its result is never committed.
    pub abort_superseded: bool,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            resolve_timeout_ms: None,
            max_query_terms: None,
            max_query_bytes: None,
            abort_superseded: false,
        }
    }
}

impl TypeaheadConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `debounce_ms` must be greater than 0
    /// - `resolve_timeout_ms`, when set, must be greater than 0
    /// - `max_query_terms`, when set, must be greater than 0
    /// - `max_query_bytes`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.debounce_ms == 0 {
            return Err(SearchError::Config(
                "debounce_ms must be greater than 0".into(),
            ));
        }
        if self.resolve_timeout_ms == Some(0) {
            return Err(SearchError::Config(
                "resolve_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.max_query_terms == Some(0) {
            return Err(SearchError::Config(
                "max_query_terms must be greater than 0".into(),
            ));
        }
        if self.max_query_bytes == Some(0) {
            return Err(SearchError::Config(
                "max_query_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_ms.map(Duration::from_millis)
    }
}

/// Connection settings for [`crate::index::HttpIndexClient`].
#[derive(Debug, Clone)]
pub struct HttpIndexConfig {
    /// Base URL of the index worker, e.g. `https://search.example.org`.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Defaults to the crate name and version.
    pub user_agent: Option<String>,
}

impl HttpIndexConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }

    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Checks the base URL parses and the timeout is non-zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_endpoint("index", &self.base_url, self.timeout_seconds)
    }
}

/// Connection settings for [`crate::resolver::HttpSummaryResolver`].
#[derive(Debug, Clone)]
pub struct HttpSummaryConfig {
    /// Base URL of the summary REST API, e.g.
    /// `https://en.wikipedia.org/api/rest_v1`.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Defaults to the crate name and version.
    pub user_agent: Option<String>,
}

impl HttpSummaryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }

    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Checks the base URL parses and the timeout is non-zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_endpoint("summary", &self.base_url, self.timeout_seconds)
    }
}

fn validate_endpoint(name: &str, base_url: &str, timeout_seconds: u64) -> Result<(), SearchError> {
    if base_url.trim().is_empty() {
        return Err(SearchError::Config(format!("{name} base_url must not be empty")));
    }
    let parsed = Url::parse(base_url)
        .map_err(|e| SearchError::Config(format!("{name} base_url is invalid: {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(SearchError::Config(format!(
            "{name} base_url cannot be used as a base"
        )));
    }
    if timeout_seconds == 0 {
        return Err(SearchError::Config(format!(
            "{name} timeout_seconds must be greater than 0"
        )));
    }
    Ok(())
}
