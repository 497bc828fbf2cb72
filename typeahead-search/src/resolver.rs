//! Summary resolver: turns one matched identifier into a [`ContentSummary`].
//!
//! The bundled [`HttpSummaryResolver`] reads page-summary documents from a
//! REST endpoint shaped like Wikipedia's `page/summary` API.

use std::future::Future;

use serde::Deserialize;
use url::Url;

use crate::config::HttpSummaryConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{ContentSummary, EntityId, MatchId};

/// A remote lookup that resolves identifiers into content summaries.
///
/// The pipeline calls [`resolve`](SummaryResolver::resolve) concurrently for
/// every identifier of an index response, so implementations must be
/// `Send + Sync`.
pub trait SummaryResolver: Send + Sync {
    /// Resolve one identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Resolution`] when the lookup fails for any
    /// reason, including a non-success status from the upstream service.
    fn resolve(
        &self,
        id: &MatchId,
    ) -> impl Future<Output = Result<ContentSummary, SearchError>> + Send;
}

/// Page summary document as served by the REST endpoint.
#[derive(Debug, Deserialize)]
struct PageSummary {
    pageid: u64,
    title: String,
    content_urls: ContentUrls,
    #[serde(default)]
    thumbnail: Option<Thumbnail>,
    #[serde(default)]
    extract: String,
    #[serde(default)]
    extract_html: String,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PageUrls,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl From<PageSummary> for ContentSummary {
    fn from(page: PageSummary) -> Self {
        Self {
            entity_id: EntityId(page.pageid),
            title: page.title,
            url: page.content_urls.desktop.page,
            thumbnail: page.thumbnail.map(|t| t.source),
            extract: page.extract,
            extract_html: page.extract_html,
        }
    }
}

/// HTTP resolver issuing `GET {base}/page/summary/<id>`.
#[derive(Debug, Clone)]
pub struct HttpSummaryResolver {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSummaryResolver {
    /// Build a resolver from validated connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for invalid settings or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HttpSummaryConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SearchError::Config(format!("summary base_url is invalid: {e}")))?;
        let client = http::build_client(config.timeout_seconds, config.user_agent.as_deref())?;
        Ok(Self { client, base_url })
    }

    /// The request URL for one identifier. The identifier is a single
    /// percent-encoded path segment.
    pub(crate) fn summary_url(&self, id: &MatchId) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SearchError::Config("summary base_url cannot be used as a base".into()))?
            .pop_if_empty()
            .extend(["page", "summary", id.as_str()]);
        Ok(url)
    }
}

impl SummaryResolver for HttpSummaryResolver {
    async fn resolve(&self, id: &MatchId) -> Result<ContentSummary, SearchError> {
        let url = self
            .summary_url(id)
            .map_err(|e| SearchError::Resolution(e.to_string()))?;
        tracing::trace!(%id, "summary lookup");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Resolution(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Resolution(format!(
                "summary returned status {status}"
            )));
        }

        let page: PageSummary = response.json().await.map_err(|e| {
            SearchError::Resolution(format!("undecodable summary: {}", e.without_url()))
        })?;
        Ok(page.into())
    }
}
