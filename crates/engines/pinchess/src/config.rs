//! Engine settings, loadable from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::SearchParams;

pub const MAX_DEPTH: u8 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Search settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Iterative-deepening limit in plies.
    pub depth: u8,
    /// Per-move time budget used when the GUI gives none.
    pub move_time_ms: Option<u64>,
    pub alpha_beta: bool,
    pub order_moves: bool,
    pub mate_short_circuit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            move_time_ms: None,
            alpha_beta: true,
            order_moves: true,
            mate_short_circuit: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(text)?;
        config.depth = config.depth.clamp(1, MAX_DEPTH);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn move_time(&self) -> Option<Duration> {
        self.move_time_ms.map(Duration::from_millis)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            alpha_beta: self.alpha_beta,
            order_moves: self.order_moves,
            mate_short_circuit: self.mate_short_circuit,
        }
    }
}
