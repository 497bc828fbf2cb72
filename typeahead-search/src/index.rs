//! Index query client: the remote search index as seen by the pipeline.
//!
//! [`IndexClient`] is the seam the pipeline calls through. The bundled
//! [`HttpIndexClient`] speaks to an index worker over HTTP; tests inject
//! in-memory fakes.

use std::future::Future;

use url::Url;

use crate::config::HttpIndexConfig;
use crate::error::SearchError;
use crate::http;
use crate::tokenize::SearchToken;
use crate::types::IndexResponse;

/// A remote search index that matches documents containing every required term.
///
/// Implementations must be `Send + Sync`: the controller shares one instance
/// across every attempt it schedules.
pub trait IndexClient: Send + Sync {
    /// Query the index for documents containing all of `required_terms`.
    ///
    /// Result order is the index's ranking and is preserved downstream.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IndexUnavailable`] on any transport or
    /// protocol failure.
    fn search(
        &self,
        required_terms: &[SearchToken],
    ) -> impl Future<Output = Result<IndexResponse, SearchError>> + Send;
}

/// HTTP client for an index worker.
///
/// Issues `GET {base}/search?require=<term>&require=<term>...` and expects a
/// JSON body of the form `{"results": [..], "more": bool}`.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpIndexClient {
    /// Build a client from validated connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for invalid settings or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HttpIndexConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SearchError::Config(format!("index base_url is invalid: {e}")))?;
        let client = http::build_client(config.timeout_seconds, config.user_agent.as_deref())?;
        Ok(Self { client, base_url })
    }

    /// The request URL for a set of required terms.
    pub(crate) fn search_url(&self, required_terms: &[SearchToken]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SearchError::Config("index base_url cannot be used as a base".into()))?
            .pop_if_empty()
            .push("search");
        if !required_terms.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for term in required_terms {
                pairs.append_pair("require", term.as_str());
            }
        }
        Ok(url)
    }
}

impl IndexClient for HttpIndexClient {
    async fn search(&self, required_terms: &[SearchToken]) -> Result<IndexResponse, SearchError> {
        let url = self.search_url(required_terms)?;
        tracing::trace!(terms = ?required_terms, "index query");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::IndexUnavailable(format!(
                "index returned status {status}"
            )));
        }

        let body: IndexResponse = response.json().await.map_err(|e| {
            SearchError::IndexUnavailable(format!("undecodable response: {}", e.without_url()))
        })?;

        tracing::debug!(count = body.results.len(), more = body.more, "index returned matches");
        Ok(body)
    }
}
