//! Run configuration (`godocfx.toml`).
//!
//! ```toml
//! [links]
//! same_domain = ["cloud.google.com/go"]
//! doc_host = "https://pkg.go.dev"
//! reference_prefix = "/go/docs/reference"
//!
//! [run]
//! extra_files = ["README.md"]
//! filter = ["cloud.google.com/go/internal"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "godocfx.toml";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How identifiers link out of a page.
    #[serde(default)]
    pub links: LinkConfig,

    /// What a run documents.
    #[serde(default)]
    pub run: RunConfig,
}

/// Link targets handed to every linker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LinkConfig {
    /// Import path prefixes whose modules are documented on the same site.
    pub same_domain: Vec<String>,

    /// Public documentation host used for everything else.
    pub doc_host: String,

    /// Path prefix of same-site reference docs.
    pub reference_prefix: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            same_domain: vec!["cloud.google.com/go".to_string()],
            doc_host: "https://pkg.go.dev".to_string(),
            reference_prefix: "/go/docs/reference".to_string(),
        }
    }
}

impl LinkConfig {
    /// Replace the same-domain allow-list.
    #[must_use]
    pub fn with_same_domain<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.same_domain = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-run inputs besides the pattern itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RunConfig {
    /// Files relative to the module root to publish next to the API pages.
    pub extra_files: Vec<String>,

    /// Import path prefixes to leave out.
    pub filter: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            extra_files: vec!["README.md".to_string()],
            filter: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.links.doc_host.is_empty() {
            return Err(ConfigError::Invalid {
                field: "links.doc_host",
                reason: "host cannot be empty",
            });
        }
        if self.links.doc_host.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "links.doc_host",
                reason: "host must not end with '/'",
            });
        }
        if !self.links.reference_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "links.reference_prefix",
                reason: "prefix must start with '/'",
            });
        }
        if self.links.same_domain.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid {
                field: "links.same_domain",
                reason: "an empty prefix would match every import",
            });
        }
        Ok(())
    }
}
