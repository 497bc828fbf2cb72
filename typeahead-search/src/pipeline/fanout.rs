//! Concurrent summary resolution.
//!
//! Every identifier is resolved at once and the fan-out waits for all of
//! them to settle. A failure or timeout affects only its own identifier.

use std::time::Duration;

use crate::resolver::SummaryResolver;
use crate::types::{ContentSummary, MatchId};

/// Resolve every identifier concurrently, preserving input order.
///
/// The output has one entry per input identifier; `None` marks a failed or
/// timed-out lookup.
pub async fn resolve_all<R: SummaryResolver>(
    resolver: &R,
    ids: &[MatchId],
    timeout: Option<Duration>,
) -> Vec<Option<ContentSummary>> {
    let lookups = ids.iter().map(|id| resolve_one(resolver, id, timeout));
    let outcomes = futures::future::join_all(lookups).await;

    let failed = outcomes.iter().filter(|o| o.is_none()).count();
    if failed > 0 {
        tracing::debug!(failed, total = ids.len(), "some summaries failed to resolve");
    }
    outcomes
}

/// Resolve a single identifier, folding every failure into `None`.
async fn resolve_one<R: SummaryResolver>(
    resolver: &R,
    id: &MatchId,
    timeout: Option<Duration>,
) -> Option<ContentSummary> {
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, resolver.resolve(id)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(%id, timeout_ms = limit.as_millis() as u64, "summary lookup timed out");
                return None;
            }
        },
        None => resolver.resolve(id).await,
    };

    match outcome {
        Ok(summary) => Some(summary),
        Err(err) => {
            tracing::warn!(%id, error = %err, "summary lookup failed");
            None
        }
    }
}
