//! Deduplication by entity id and the asset / no-asset split.

use std::collections::HashSet;

use crate::types::{ContentSummary, FulfilledResult};

/// Merge resolution outcomes into a [`FulfilledResult`].
///
/// Outcomes are walked in index order. Failed lookups (`None`) are skipped;
/// of several summaries sharing an entity id only the first is kept. Each
/// survivor lands in `with_asset` or `without_asset` depending on whether it
/// carries a visual asset. `more` is passed through unchanged.
pub fn classify(outcomes: Vec<Option<ContentSummary>>, more: bool) -> FulfilledResult {
    let mut seen = HashSet::new();
    let mut result = FulfilledResult {
        more,
        ..FulfilledResult::default()
    };

    for summary in outcomes.into_iter().flatten() {
        if !seen.insert(summary.entity_id) {
            continue;
        }
        if summary.has_visual_asset() {
            result.with_asset.push(summary);
        } else {
            result.without_asset.push(summary);
        }
    }

    result.count = result.with_asset.len() + result.without_asset.len();
    result
}
