//! Fulfillment pipeline: index query, concurrent summary fan-out, classification.
//!
//! One call to [`fulfil`] is the body of one attempt. It knows nothing about
//! debouncing or generations; the controller decides whether its output is
//! still wanted.

pub mod classify;
pub mod fanout;

use crate::config::TypeaheadConfig;
use crate::error::SearchError;
use crate::index::IndexClient;
use crate::resolver::SummaryResolver;
use crate::tokenize::SearchToken;
use crate::types::FulfilledResult;

use classify::classify;
use fanout::resolve_all;

/// Run one attempt for an already tokenized query.
///
/// # Pipeline
///
/// 1. An empty token set short-circuits to an empty result; the index is not
///    called
/// 2. Collapse repeated tokens and apply `config.max_query_terms` and
///    `config.max_query_bytes`. If no term fits the byte budget the result is
///    empty and the index is not called
/// 3. Query the index
/// 4. Resolve every returned identifier concurrently
/// 5. Dedup by entity id and split into asset / no-asset buckets
///
/// # Errors
///
/// Returns [`SearchError::IndexUnavailable`] if the index query fails. Summary
/// failures never fail the attempt; the affected entries are dropped.
pub async fn fulfil<I, R>(
    index: &I,
    resolver: &R,
    tokens: &[SearchToken],
    config: &TypeaheadConfig,
) -> Result<FulfilledResult, SearchError>
where
    I: IndexClient,
    R: SummaryResolver,
{
    if tokens.is_empty() {
        tracing::debug!("empty query, skipping index");
        return Ok(FulfilledResult::default());
    }

    let terms = required_terms(tokens, config);
    if terms.is_empty() {
        tracing::debug!("no term fits the query byte limit, skipping index");
        return Ok(FulfilledResult::default());
    }
    let response = index.search(&terms).await.map_err(|err| match err {
        SearchError::IndexUnavailable(_) => err,
        other => SearchError::IndexUnavailable(other.to_string()),
    })?;

    let outcomes = resolve_all(resolver, &response.results, config.resolve_timeout()).await;
    let result = classify(outcomes, response.more);
    tracing::debug!(
        matches = response.results.len(),
        count = result.count,
        more = result.more,
        "attempt fulfilled"
    );
    Ok(result)
}

/// Distinct tokens in first-occurrence order, capped by the configured term
/// count and byte budget.
pub(crate) fn required_terms(tokens: &[SearchToken], config: &TypeaheadConfig) -> Vec<SearchToken> {
    let mut terms: Vec<SearchToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !terms.contains(token) {
            terms.push(token.clone());
        }
    }
    if let Some(limit) = config.max_query_terms {
        if terms.len() > limit {
            tracing::debug!(dropped = terms.len() - limit, limit, "query exceeds term limit");
            terms.truncate(limit);
        }
    }
    if let Some(budget) = config.max_query_bytes {
        let mut used = 0;
        let fits = terms
            .iter()
            .take_while(|term| {
                used += term.as_str().len();
                used <= budget
            })
            .count();
        if fits < terms.len() {
            tracing::debug!(dropped = terms.len() - fits, budget, "query exceeds byte limit");
            terms.truncate(fits);
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;
    use crate::types::{ContentSummary, EntityId, IndexResponse, MatchId};
    use std::sync::Mutex;

    struct RecordingIndex {
        response: Result<IndexResponse, String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingIndex {
        fn ok(ids: &[&str], more: bool) -> Self {
            Self {
                response: Ok(IndexResponse {
                    results: ids.iter().map(|s| MatchId::from(*s)).collect(),
                    more,
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err("connection refused".into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl IndexClient for RecordingIndex {
        async fn search(&self, required_terms: &[SearchToken]) -> Result<IndexResponse, SearchError> {
            self.calls
                .lock()
                .expect("lock")
                .push(required_terms.iter().map(|t| t.to_string()).collect());
            match &self.response {
                Ok(r) => Ok(r.clone()),
                Err(msg) => Err(SearchError::IndexUnavailable(msg.clone())),
            }
        }
    }

    /// Ids look like `<entity>` or `<entity>:img`; `fail` always errors.
    struct ParsingResolver;

    impl SummaryResolver for ParsingResolver {
        async fn resolve(&self, id: &MatchId) -> Result<ContentSummary, SearchError> {
            if id.as_str() == "fail" {
                return Err(SearchError::Resolution("status 500".into()));
            }
            let (entity, img) = match id.as_str().split_once(':') {
                Some((e, _)) => (e, true),
                None => (id.as_str(), false),
            };
            Ok(ContentSummary {
                entity_id: EntityId(entity.parse().unwrap_or(0)),
                title: id.to_string(),
                url: format!("https://example.org/{entity}"),
                thumbnail: img.then(|| format!("https://img.example.org/{entity}.png")),
                extract: String::new(),
                extract_html: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn empty_tokens_skip_the_index() {
        let index = RecordingIndex::ok(&["1"], true);
        let result = fulfil(&index, &ParsingResolver, &[], &TypeaheadConfig::default())
            .await
            .expect("ok");
        assert_eq!(result, FulfilledResult::default());
        assert!(index.calls().is_empty());
    }

    #[tokio::test]
    async fn partial_resolver_failure_keeps_the_rest() {
        let index = RecordingIndex::ok(&["1", "fail", "2:img"], true);
        let result = fulfil(&index, &ParsingResolver, &tokenize("x"), &TypeaheadConfig::default())
            .await
            .expect("ok");
        assert_eq!(result.count, 2);
        assert_eq!(result.with_asset.len(), 1);
        assert_eq!(result.without_asset.len(), 1);
        assert!(result.more);
    }

    #[tokio::test]
    async fn duplicate_entities_collapse() {
        let index = RecordingIndex::ok(&["9", "9:img", "4"], false);
        let result = fulfil(&index, &ParsingResolver, &tokenize("x"), &TypeaheadConfig::default())
            .await
            .expect("ok");
        assert_eq!(result.count, 2);
        assert!(result.with_asset.is_empty());
        assert_eq!(result.without_asset[0].title, "9");
    }

    #[tokio::test]
    async fn index_failure_is_fatal() {
        let index = RecordingIndex::failing();
        let err = fulfil(&index, &ParsingResolver, &tokenize("x"), &TypeaheadConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable(_)));
    }

    #[tokio::test]
    async fn repeated_tokens_sent_once_and_capped() {
        let index = RecordingIndex::ok(&[], false);
        let config = TypeaheadConfig {
            max_query_terms: Some(2),
            ..Default::default()
        };
        fulfil(&index, &ParsingResolver, &tokenize("b a b c a"), &config)
            .await
            .expect("ok");
        assert_eq!(index.calls(), vec![vec!["b".to_owned(), "a".to_owned()]]);
    }

    #[test]
    fn required_terms_without_limit_keeps_all_distinct() {
        let terms = required_terms(&tokenize("x y x z"), &TypeaheadConfig::default());
        assert_eq!(terms, ["x", "y", "z"]);
    }

    #[test]
    fn byte_limit_drops_trailing_terms() {
        let config = TypeaheadConfig {
            max_query_bytes: Some(10),
            ..Default::default()
        };
        let terms = required_terms(&tokenize("rust lang compiler"), &config);
        assert_eq!(terms, ["rust", "lang"]);
    }

    #[tokio::test]
    async fn oversized_first_term_skips_the_index() {
        let index = RecordingIndex::ok(&["1"], true);
        let config = TypeaheadConfig {
            max_query_bytes: Some(3),
            ..Default::default()
        };
        let result = fulfil(&index, &ParsingResolver, &tokenize("typeahead"), &config)
            .await
            .expect("ok");
        assert_eq!(result, FulfilledResult::default());
        assert!(index.calls().is_empty());
    }
}
