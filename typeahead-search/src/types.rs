//! Core types for index responses, content summaries and fulfilled results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one matched item, as returned by the index.
///
/// The index does not guarantee uniqueness within a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Stable identity of a resolved entity. Used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of matches from the index, in ranked order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Matched identifiers, best first.
    pub results: Vec<MatchId>,
    /// Whether the index holds further matches beyond `results`.
    pub more: bool,
}

/// Resolved content for one matched identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    /// Entity identity, distinct from the [`MatchId`] that produced it.
    pub entity_id: EntityId,
    pub title: String,
    /// Canonical URL of the entity.
    pub url: String,
    /// Thumbnail or other visual asset, when the entity has one.
    pub thumbnail: Option<String>,
    /// Plain-text excerpt.
    pub extract: String,
    /// Formatted (HTML) excerpt.
    pub extract_html: String,
}

impl ContentSummary {
    /// True when a non-empty visual asset reference is present.
    pub fn has_visual_asset(&self) -> bool {
        self.thumbnail.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The committed outcome of one attempt.
///
/// Every entity id appears at most once across both buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfilledResult {
    /// Summaries carrying a visual asset, in index order.
    pub with_asset: Vec<ContentSummary>,
    /// Summaries without a visual asset, in index order.
    pub without_asset: Vec<ContentSummary>,
    /// Total of both buckets after deduplication.
    pub count: usize,
    /// Copied unchanged from the index response.
    pub more: bool,
}

impl FulfilledResult {
    /// Iterate over both buckets, assets first.
    pub fn iter(&self) -> impl Iterator<Item = &ContentSummary> {
        self.with_asset.iter().chain(self.without_asset.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Monotonic marker for a fulfillment attempt.
///
/// Only the attempt holding the current generation may write results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that supersedes this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
