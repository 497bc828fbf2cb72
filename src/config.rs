//! Configuration file for the typeahead host.
//!
//! A TOML file with three tables (`[index]`, `[summary]`, `[typeahead]`).
//! Every field has a default, so a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use typeahead_search::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_TIMEOUT_SECONDS};
use typeahead_search::{HttpIndexConfig, HttpSummaryConfig, TypeaheadConfig};

use crate::error::{HostError, Result};

/// Top-level host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Search index worker.
    pub index: EndpointConfig,
    /// Page summary REST API.
    pub summary: EndpointConfig,
    /// Debounce and pipeline tuning.
    pub typeahead: TypeaheadSection,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            index: EndpointConfig {
                base_url: "http://127.0.0.1:8787".into(),
                ..EndpointConfig::default()
            },
            summary: EndpointConfig {
                base_url: "https://en.wikipedia.org/api/rest_v1".into(),
                ..EndpointConfig::default()
            },
            typeahead: TypeaheadSection::default(),
        }
    }
}

/// One remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Omit to use the crate default.
    pub user_agent: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }
}

/// Mirrors [`TypeaheadConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadSection {
    pub debounce_ms: u64,
    pub resolve_timeout_ms: Option<u64>,
    pub max_query_terms: Option<usize>,
    pub max_query_bytes: Option<usize>,
    pub abort_superseded: bool,
    /// How long to wait for the last attempt to settle after input ends.
    pub settle_timeout_ms: u64,
}

impl Default for TypeaheadSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            resolve_timeout_ms: None,
            max_query_terms: None,
            max_query_bytes: None,
            abort_superseded: false,
            settle_timeout_ms: 15_000,
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HostError::Config(e.to_string()))
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HostError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/typeahead/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("typeahead")
            .join("config.toml")
    }

    pub fn typeahead_config(&self) -> TypeaheadConfig {
        TypeaheadConfig {
            debounce_ms: self.typeahead.debounce_ms,
            resolve_timeout_ms: self.typeahead.resolve_timeout_ms,
            max_query_terms: self.typeahead.max_query_terms,
            max_query_bytes: self.typeahead.max_query_bytes,
            abort_superseded: self.typeahead.abort_superseded,
        }
    }

    pub fn index_config(&self) -> HttpIndexConfig {
        let mut config = HttpIndexConfig::new(&self.index.base_url)
            .with_timeout_seconds(self.index.timeout_seconds);
        if let Some(ua) = &self.index.user_agent {
            config = config.with_user_agent(ua);
        }
        config
    }

    pub fn summary_config(&self) -> HttpSummaryConfig {
        let mut config = HttpSummaryConfig::new(&self.summary.base_url)
            .with_timeout_seconds(self.summary.timeout_seconds);
        if let Some(ua) = &self.summary.user_agent {
            config = config.with_user_agent(ua);
        }
        config
    }

    /// Validate every section through the search crate's own checks.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Search`] for the first invalid section.
    pub fn validate(&self) -> Result<()> {
        self.typeahead_config().validate()?;
        self.index_config().validate()?;
        self.summary_config().validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = HostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.typeahead.debounce_ms, 250);
        assert_eq!(config.summary.base_url, "https://en.wikipedia.org/api/rest_v1");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: HostConfig = toml::from_str(
            r#"
            [index]
            base_url = "https://search.example.org"

            [typeahead]
            debounce_ms = 120
            "#,
        )
        .expect("parse");
        assert_eq!(config.index.base_url, "https://search.example.org");
        assert_eq!(config.index.timeout_seconds, 8);
        assert_eq!(config.typeahead.debounce_ms, 120);
        assert_eq!(config.summary, HostConfig::default().summary);
    }

    #[test]
    fn sections_map_onto_search_configs() {
        let mut config = HostConfig::default();
        config.typeahead.resolve_timeout_ms = Some(900);
        config.typeahead.abort_superseded = true;
        config.summary.user_agent = Some("TestBot/1.0".into());

        let core = config.typeahead_config();
        assert_eq!(core.resolve_timeout_ms, Some(900));
        assert!(core.abort_superseded);
        assert_eq!(
            config.summary_config().user_agent.as_deref(),
            Some("TestBot/1.0")
        );
        assert!(config.index_config().user_agent.is_none());
    }

    #[test]
    fn invalid_section_is_reported() {
        let mut config = HostConfig::default();
        config.index.base_url = "nope".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("index base_url"));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = HostConfig::default_config_path();
        assert!(path.ends_with("typeahead/config.toml"));
    }
}
