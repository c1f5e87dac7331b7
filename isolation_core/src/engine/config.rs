use crate::engine::eval::Heuristic;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Minimax,
    #[default]
    AlphaBeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub heuristic: Heuristic,
    pub algorithm: SearchAlgorithm,

    // Search Parameters
    pub max_depth: u8,
    pub time_limit_ms: u64,
    pub check_interval: u64, // nodes between cancellation polls

    // Plies played at random before searching
    pub opening_plies: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            algorithm: SearchAlgorithm::default(),
            max_depth: 16,
            time_limit_ms: 150,
            check_interval: 1024,
            opening_plies: 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_json(&text)
    }

    #[must_use]
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
