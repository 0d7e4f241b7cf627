//! Matcher configuration.
//!
//! Configuration is read from `config.toml` in the platform config dir
//! (`~/.config/emoji-matcher/config.toml` on Linux) or from an explicit path:
//!
//! ```toml
//! languages = ["de_CH", "ja_JP"]
//! match_algorithm = "fuzzy"
//! match_limit = 20
//! spellcheck = false
//! cache_capacity = 256
//! ```
//!
//! Every field is optional. A missing default file yields the defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating matcher configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Which per-entry scoring strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchAlgorithm {
    /// Token intersection with prefix credit.
    #[default]
    Classic,
    /// String-similarity ratios against names and keywords.
    #[serde(alias = "rapidfuzz")]
    Fuzzy,
}

impl fmt::Display for MatchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchAlgorithm::Classic => write!(f, "classic"),
            MatchAlgorithm::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

impl FromStr for MatchAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(MatchAlgorithm::Classic),
            "fuzzy" | "rapidfuzz" => Ok(MatchAlgorithm::Fuzzy),
            other => Err(ConfigError::Validation(format!(
                "unknown match algorithm '{other}' (expected classic or fuzzy)"
            ))),
        }
    }
}

/// Configuration for candidate matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Ordered language tags (default: empty, meaning English only).
    pub languages: Vec<String>,
    /// Scoring strategy (default: classic).
    pub match_algorithm: MatchAlgorithm,
    /// Maximum candidates per query (default: 20).
    pub match_limit: usize,
    /// Expand query words with spell-checker suggestions (default: false).
    pub spellcheck: bool,
    /// Memoized query results kept per matcher (default: 256, 0 disables).
    pub cache_capacity: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            match_algorithm: MatchAlgorithm::Classic,
            match_limit: 20,
            spellcheck: false,
            cache_capacity: 256,
        }
    }
}

impl MatcherConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MatcherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the default config file, falling back to defaults if it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_limit == 0 {
            return Err(ConfigError::Validation(
                "match_limit must be at least 1".to_string(),
            ));
        }
        if let Some(bad) = self.languages.iter().find(|l| l.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "empty language tag in languages: {bad:?}"
            )));
        }
        Ok(())
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_algorithm(mut self, algorithm: MatchAlgorithm) -> Self {
        self.match_algorithm = algorithm;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.match_limit = limit;
        self
    }

    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "emoji-matcher", "emoji-matcher")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
