//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Cost weights used when placing a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawWeights {
    /// Weight of the team strength gap
    #[serde(default = "default_strength_weight")]
    pub strength: f64,

    /// Weight of the per-position count gap
    #[serde(default = "default_position_weight")]
    pub position: f64,

    /// Weight of repeated teammates from recent games
    #[serde(default = "default_teammate_weight")]
    pub teammate: f64,
}

fn default_strength_weight() -> f64 {
    1.0
}

fn default_position_weight() -> f64 {
    1.3
}

fn default_teammate_weight() -> f64 {
    1.0
}

impl Default for DrawWeights {
    fn default() -> Self {
        Self {
            strength: default_strength_weight(),
            position: default_position_weight(),
            teammate: default_teammate_weight(),
        }
    }
}

/// Team draw configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// How many recent drawn games feed the teammate history
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Upper bound (exclusive) of the jitter added to each strength
    #[serde(default = "default_strength_jitter")]
    pub strength_jitter: f64,

    /// Upper bound (exclusive) of the jitter added to each placement cost
    #[serde(default = "default_cost_jitter")]
    pub cost_jitter: f64,

    #[serde(default)]
    pub weights: DrawWeights,
}

fn default_recent_window() -> usize {
    12
}

fn default_strength_jitter() -> f64 {
    0.1
}

fn default_cost_jitter() -> f64 {
    0.05
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            strength_jitter: default_strength_jitter(),
            cost_jitter: default_cost_jitter(),
            weights: DrawWeights::default(),
        }
    }
}

impl DrawConfig {
    /// Validate weights, window and jitter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_window == 0 {
            return Err(ConfigError::ValidationError(
                "Recent window must be greater than 0".to_string(),
            ));
        }

        let values = [
            ("weights.strength", self.weights.strength),
            ("weights.position", self.weights.position),
            ("weights.teammate", self.weights.teammate),
            ("strength_jitter", self.strength_jitter),
            ("cost_jitter", self.cost_jitter),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub draw: DrawConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            draw: DrawConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.draw.validate()
    }
}
