//! Configuration management for eightfold
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.eightfold/config.toml

use crate::cli::args::Verbosity;
use crate::convergence::{ConvergenceConfig, DEFAULT_MAX_ITERATIONS};
use crate::errors::{HealError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for eightfold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub convergence: ConvergenceSettings,
    pub output: OutputConfig,
}

/// Convergence loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceSettings {
    pub max_iterations: u32,

    /// Fixed seed for the simulated executor; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_verbosity: String,
    pub show_progress_bars: bool,
    pub color_output: bool,
    pub json: bool,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            show_progress_bars: true,
            color_output: true,
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| HealError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| HealError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".eightfold").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.convergence.max_iterations == 0 {
            return Err(HealError::ConfigError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if Verbosity::from_name(&self.output.default_verbosity).is_none() {
            return Err(HealError::ConfigError(format!(
                "Invalid verbosity level: {}",
                self.output.default_verbosity
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| HealError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| HealError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HealError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Configured default verbosity
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_name(&self.output.default_verbosity).unwrap_or(Verbosity::Normal)
    }

    /// Loop configuration, with an optional iteration override
    pub fn convergence_config(&self, max_iterations: Option<u32>) -> ConvergenceConfig {
        ConvergenceConfig {
            max_iterations: max_iterations.unwrap_or(self.convergence.max_iterations),
            ..Default::default()
        }
    }
}
