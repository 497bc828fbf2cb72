//! Typeahead: search-as-you-type host.
//!
//! Wires the [`typeahead_search`] core to its HTTP collaborators from a TOML
//! configuration file and exposes it over a line-oriented stdin/stdout
//! bridge:
//!
//! stdin (raw query per line) → QueryController → stdout (JSON snapshot per change)
//!
//! # Architecture
//!
//! - **Config**: `HostConfig`, a TOML file mapped onto the core's configs
//! - **Host bridge**: feeds input lines to the controller and forwards every
//!   snapshot change as JSON

pub mod config;
pub mod error;
pub mod host;

pub use config::HostConfig;
pub use error::{HostError, Result};

use typeahead_search::{HttpIndexClient, HttpSummaryResolver, QueryController};

/// Controller over the bundled HTTP collaborators.
pub type HttpController = QueryController<HttpIndexClient, HttpSummaryResolver>;

/// Build a controller from host configuration.
///
/// # Errors
///
/// Returns [`HostError::Search`] if any section is invalid or an HTTP client
/// cannot be built.
pub fn build_controller(config: &HostConfig) -> Result<HttpController> {
    config.validate()?;
    let index = HttpIndexClient::new(&config.index_config())?;
    let resolver = HttpSummaryResolver::new(&config.summary_config())?;
    let controller = QueryController::new(index, resolver, config.typeahead_config())?;
    Ok(controller)
}
