//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [corpus]
//! total_transactions = 5000
//! total_apparences = 310000
//!
//! [recommender]
//! top_n = 5
//! min_seed_tropes = 2
//!
//! [recommender.policy]
//! kind = "count"
//! penalty = "raw"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::recommender::{RecommenderConfig, MIN_SEED_TROPES};
use trope_corpus::CorpusStats;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Corpus totals; when absent the store is asked for them.
    #[serde(default)]
    pub corpus: Option<CorpusStats>,

    #[serde(default)]
    pub recommender: RecommenderConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rec = &self.recommender;
        if rec.top_n == 0 {
            return Err(ConfigError::invalid("recommender.top_n", "must be at least 1"));
        }
        if rec.min_seed_tropes < MIN_SEED_TROPES {
            return Err(ConfigError::invalid(
                "recommender.min_seed_tropes",
                format!("must be at least {MIN_SEED_TROPES}"),
            ));
        }
        if rec.max_input_len == 0 {
            return Err(ConfigError::invalid(
                "recommender.max_input_len",
                "must be at least 1",
            ));
        }
        if let Some(corpus) = &self.corpus {
            if !corpus.is_valid() {
                return Err(ConfigError::invalid(
                    "corpus",
                    "total_transactions and total_apparences must be positive",
                ));
            }
        }
        Ok(())
    }
}
