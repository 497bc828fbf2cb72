//! Query tokenization.

use serde::Serialize;
use std::fmt;

/// A normalized, non-empty, lowercase search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SearchToken(String);

impl SearchToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for SearchToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Split raw input into search tokens.
///
/// Any maximal run of characters outside `[A-Za-z0-9]` is a separator.
/// Empty fragments are discarded and the rest lowercased.
///
/// ```
/// use typeahead_search::tokenize::tokenize;
///
/// let tokens = tokenize("Hello, World! 42");
/// assert_eq!(tokens, ["hello", "world", "42"]);
/// ```
pub fn tokenize(raw: &str) -> Vec<SearchToken> {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| SearchToken(fragment.to_ascii_lowercase()))
        .collect()
}
