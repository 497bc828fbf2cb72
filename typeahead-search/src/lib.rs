//! # typeahead-search
//!
//! Search-as-you-type fulfillment for an interactive search box.
//!
//! Keystrokes arrive faster than network round-trips complete. This crate
//! turns each change of the raw query into at most one attempt per quiet
//! period and guarantees that only the newest attempt ever becomes visible.
//!
//! ## Design
//!
//! - Raw input is split into lowercase alphanumeric tokens
//! - After a debounce interval the tokens are sent to a remote index as a
//!   required-term set
//! - Every matched identifier is resolved into a content summary
//!   concurrently; individual lookup failures are dropped, not fatal
//! - Summaries are deduplicated by entity id and split by whether they
//!   carry a visual asset
//! - A generation counter rejects results from superseded attempts
//!
//! The index and the summary lookup are injected through the
//! [`IndexClient`] and [`SummaryResolver`] traits. HTTP implementations of
//! both are bundled.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> typeahead_search::Result<()> {
//! use typeahead_search::{
//!     HttpIndexClient, HttpIndexConfig, HttpSummaryConfig, HttpSummaryResolver,
//!     QueryController, TypeaheadConfig,
//! };
//!
//! let index = HttpIndexClient::new(&HttpIndexConfig::new("https://search.example.org"))?;
//! let resolver = HttpSummaryResolver::new(&HttpSummaryConfig::new(
//!     "https://en.wikipedia.org/api/rest_v1",
//! ))?;
//! let controller = QueryController::new(index, resolver, TypeaheadConfig::default())?;
//!
//! controller.set_query("rust prog");
//! controller.set_query("rust programming");
//! let snapshot = controller.settled().await;
//! if let Some(results) = snapshot.results {
//!     for summary in results.iter() {
//!         println!("{}: {}", summary.title, summary.url);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod index;
pub mod pipeline;
pub mod resolver;
pub mod state;
pub mod tokenize;
pub mod types;

pub use config::{HttpIndexConfig, HttpSummaryConfig, TypeaheadConfig};
pub use controller::QueryController;
pub use error::{Result, SearchError};
pub use index::{HttpIndexClient, IndexClient};
pub use resolver::{HttpSummaryResolver, SummaryResolver};
pub use state::{QuerySnapshot, QueryState};
pub use tokenize::{tokenize, SearchToken};
pub use types::{ContentSummary, EntityId, FulfilledResult, Generation, IndexResponse, MatchId};
