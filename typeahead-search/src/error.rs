//! Error types for the typeahead-search crate.
//!
//! Messages are stable strings suitable for display and for programmatic
//! matching. Query text never appears in an error message.

/// Errors that can occur while fulfilling a search query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The index query failed. Fatal to the attempt that issued it.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// A single summary lookup failed. Isolated to that identifier.
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// An HTTP client could not be constructed or a request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for typeahead-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
