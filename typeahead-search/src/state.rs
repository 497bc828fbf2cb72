//! Observable query state.
//!
//! [`QueryState`] owns the raw query, the current [`Generation`] and the latest
//! result snapshot. Every write goes through the [`tokio::sync::watch`]
//! sender, which serializes writers and notifies subscribers. A commit is a
//! compare-and-swap on the generation: results from any attempt other than
//! the current one are rejected.

use serde::Serialize;
use tokio::sync::watch;

use crate::types::{FulfilledResult, Generation};

/// What a caller observes: the query and, once committed, its results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySnapshot {
    /// The raw query as last set by the caller.
    pub query: String,
    /// Generation of the attempt this snapshot belongs to.
    pub generation: Generation,
    /// `None` while the current attempt is pending, superseded or failed.
    pub results: Option<FulfilledResult>,
    /// Set when the current attempt failed fatally. `results` stays `None`.
    pub failure: Option<String>,
}

impl QuerySnapshot {
    /// True once the current attempt has either committed or failed.
    pub fn is_settled(&self) -> bool {
        self.results.is_some() || self.failure.is_some()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_settled()
    }
}

/// Single-writer container for the caller-visible state.
#[derive(Debug)]
pub struct QueryState {
    tx: watch::Sender<QuerySnapshot>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(QuerySnapshot::default());
        Self { tx }
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.tx.subscribe()
    }

    /// The generation currently allowed to commit.
    pub(crate) fn current_generation(&self) -> Generation {
        self.tx.borrow().generation
    }

    /// Replace the query, clear results and mint the next generation.
    pub(crate) fn begin(&self, raw: String) -> Generation {
        let mut minted = Generation::default();
        self.tx.send_modify(|snap| {
            minted = snap.generation.next();
            *snap = QuerySnapshot {
                query: raw,
                generation: minted,
                results: None,
                failure: None,
            };
        });
        minted
    }

    /// The raw query, if `generation` is still current.
    pub(crate) fn query_if_current(&self, generation: Generation) -> Option<String> {
        let snap = self.tx.borrow();
        (snap.generation == generation).then(|| snap.query.clone())
    }

    /// Commit `result` if `generation` is still current. Returns whether it
    /// was committed.
    pub(crate) fn commit(&self, generation: Generation, result: FulfilledResult) -> bool {
        self.tx.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            snap.results = Some(result);
            snap.failure = None;
            true
        })
    }

    /// Record a fatal failure if `generation` is still current. Results stay
    /// absent. Returns whether it was recorded.
    pub(crate) fn fail(&self, generation: Generation, message: String) -> bool {
        self.tx.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            snap.results = None;
            snap.failure = Some(message);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_count(count: usize) -> FulfilledResult {
        FulfilledResult {
            count,
            ..FulfilledResult::default()
        }
    }

    #[test]
    fn initial_snapshot_is_empty_and_pending() {
        let state = QueryState::new();
        let snap = state.snapshot();
        assert_eq!(snap.query, "");
        assert_eq!(snap.generation, Generation(0));
        assert!(snap.is_pending());
    }

    #[test]
    fn begin_mints_increasing_generations_and_clears_results() {
        let state = QueryState::new();
        let g1 = state.begin("ru".into());
        assert!(state.commit(g1, result_with_count(3)));
        assert!(state.snapshot().is_settled());

        let g2 = state.begin("rust".into());
        assert!(g2 > g1);
        let snap = state.snapshot();
        assert_eq!(snap.query, "rust");
        assert!(snap.results.is_none());
        assert!(snap.failure.is_none());
    }

    #[test]
    fn stale_commit_is_rejected() {
        let state = QueryState::new();
        let stale = state.begin("a".into());
        let fresh = state.begin("ab".into());
        assert!(!state.commit(stale, result_with_count(1)));
        assert!(state.snapshot().results.is_none());
        assert!(state.commit(fresh, result_with_count(2)));
        assert_eq!(state.snapshot().results.map(|r| r.count), Some(2));
    }

    #[test]
    fn stale_failure_is_rejected() {
        let state = QueryState::new();
        let stale = state.begin("a".into());
        let _fresh = state.begin("ab".into());
        assert!(!state.fail(stale, "index unavailable".into()));
        assert!(state.snapshot().failure.is_none());
    }

    #[test]
    fn failure_keeps_results_absent() {
        let state = QueryState::new();
        let g = state.begin("a".into());
        assert!(state.fail(g, "index unavailable: boom".into()));
        let snap = state.snapshot();
        assert!(snap.results.is_none());
        assert_eq!(snap.failure.as_deref(), Some("index unavailable: boom"));
        assert!(snap.is_settled());
    }

    #[test]
    fn query_if_current_tracks_generation() {
        let state = QueryState::new();
        let g1 = state.begin("one".into());
        assert_eq!(state.query_if_current(g1).as_deref(), Some("one"));
        let g2 = state.begin("two".into());
        assert!(state.query_if_current(g1).is_none());
        assert_eq!(state.query_if_current(g2).as_deref(), Some("two"));
        assert_eq!(state.current_generation(), g2);
    }

    #[tokio::test]
    async fn subscribers_see_commits_but_not_rejections() {
        let state = QueryState::new();
        let mut rx = state.subscribe();
        let g = state.begin("q".into());
        rx.borrow_and_update();

        assert!(!state.commit(Generation(99), result_with_count(1)));
        assert!(!rx.has_changed().expect("sender alive"));

        assert!(state.commit(g, result_with_count(1)));
        assert!(rx.has_changed().expect("sender alive"));
    }
}
