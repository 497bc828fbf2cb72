//! Debounce controller: turns a stream of `set_query` calls into at most one
//! attempt per quiet period and makes sure only the latest attempt commits.
//!
//! # Attempt lifecycle
//!
//! ```text
//! set_query ──► begin (new generation, results cleared)
//!                 │
//!                 ▼
//!           debounce sleep ──cancelled by next set_query──► dropped
//!                 │
//!                 ▼
//!     tokenize ─► index ─► fan-out ─► classify
//!                 │
//!                 ▼
//!      commit iff generation still current, else discard
//! ```
//!
//! Superseded pipelines keep running unless
//! [`TypeaheadConfig::abort_superseded`] is set; their output is rejected by
//! the generation compare in [`QueryState`].

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TypeaheadConfig;
use crate::error::SearchError;
use crate::index::IndexClient;
use crate::pipeline;
use crate::resolver::SummaryResolver;
use crate::state::{QuerySnapshot, QueryState};
use crate::tokenize::tokenize;
use crate::types::Generation;

/// Owns the query state and the injected collaborators.
///
/// `set_query` spawns onto the ambient tokio runtime, so it must be called
/// from within one.
pub struct QueryController<I, R> {
    index: Arc<I>,
    resolver: Arc<R>,
    config: TypeaheadConfig,
    state: Arc<QueryState>,
    /// Cancels the most recently scheduled attempt.
    pending: Mutex<Option<CancellationToken>>,
}

impl<I, R> QueryController<I, R>
where
    I: IndexClient + 'static,
    R: SummaryResolver + 'static,
{
    /// Create a controller around the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(index: I, resolver: R, config: TypeaheadConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            index: Arc::new(index),
            resolver: Arc::new(resolver),
            config,
            state: Arc::new(QueryState::new()),
            pending: Mutex::new(None),
        })
    }

    /// Replace the raw query and schedule a new attempt.
    ///
    /// Results are cleared immediately. Any attempt still waiting out its
    /// debounce interval is cancelled.
    pub fn set_query(&self, raw: impl Into<String>) -> Generation {
        let raw = raw.into();
        let cancel = CancellationToken::new();

        // Minting the generation and swapping the token must happen under one
        // lock, or a concurrent caller could cancel the newer attempt.
        let (generation, previous) = {
            let mut pending = self
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let generation = self.state.begin(raw);
            (generation, pending.replace(cancel.clone()))
        };
        if let Some(previous) = previous {
            previous.cancel();
        }

        debug!(%generation, debounce_ms = self.config.debounce_ms, "attempt scheduled");
        let attempt = Attempt {
            generation,
            index: Arc::clone(&self.index),
            resolver: Arc::clone(&self.resolver),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            cancel,
        };
        tokio::spawn(attempt.run());
        generation
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.state.snapshot()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.state.subscribe()
    }

    /// Wait until the current attempt has committed or failed.
    ///
    /// A later `set_query` restarts the wait for the newer attempt.
    pub async fn settled(&self) -> QuerySnapshot {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(QuerySnapshot::is_settled).await {
            Ok(snap) => snap.clone(),
            // The sender lives in `self.state`, so this only happens on teardown.
            Err(_) => self.state.snapshot(),
        };
        settled
    }

    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }
}

impl<I, R> Drop for QueryController<I, R> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(cancel) = pending {
            cancel.cancel();
        }
    }
}

/// Everything one scheduled attempt needs, moved into its task.
struct Attempt<I, R> {
    generation: Generation,
    index: Arc<I>,
    resolver: Arc<R>,
    config: TypeaheadConfig,
    state: Arc<QueryState>,
    cancel: CancellationToken,
}

impl<I, R> Attempt<I, R>
where
    I: IndexClient,
    R: SummaryResolver,
{
    async fn run(self) {
        let generation = self.generation;

        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(%generation, "attempt cancelled before firing");
                return;
            }
            _ = tokio::time::sleep(self.config.debounce()) => {}
        }

        let Some(raw) = self.state.query_if_current(generation) else {
            debug!(%generation, "attempt superseded before firing");
            return;
        };
        let tokens = tokenize(&raw);
        debug!(%generation, tokens = tokens.len(), "attempt fired");

        let work = pipeline::fulfil(&*self.index, &*self.resolver, &tokens, &self.config);
        let outcome = if self.config.abort_superseded {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(%generation, "superseded attempt aborted");
                    return;
                }
                outcome = work => outcome,
            }
        } else {
            work.await
        };

        match outcome {
            Ok(result) => {
                let count = result.count;
                if self.state.commit(generation, result) {
                    debug!(%generation, count, "attempt committed");
                } else {
                    debug!(
                        %generation,
                        current = %self.state.current_generation(),
                        "superseded attempt discarded"
                    );
                }
            }
            Err(err) => {
                if self.state.fail(generation, err.to_string()) {
                    warn!(%generation, error = %err, "attempt failed");
                } else {
                    debug!(%generation, error = %err, "superseded attempt failed; ignored");
                }
            }
        }
    }
}
