//! Configuration handling for the reportviz CLI
//!
//! Supports loading configuration from reportviz.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use reportviz_core::{CompileOptions, DEFAULT_OVERFLOW_CAP};
use reportviz_render::HandoffConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// File looked up in the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "reportviz.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compile: CompileOptions,
    #[serde(default)]
    pub bins: BinsConfig,
    #[serde(default)]
    pub handoff: HandoffConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinsConfig {
    /// Maximum number of data points tracked per hexbin bin
    #[serde(default = "default_overflow_cap")]
    pub overflow_cap: usize,
}

fn default_overflow_cap() -> usize { DEFAULT_OVERFLOW_CAP }

impl Default for BinsConfig {
    fn default() -> Self {
        Self {
            overflow_cap: default_overflow_cap(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        log::info!("Configuration written to: {}", path.display());
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.compile.bar_area_threshold, 200);
        assert_eq!(config.bins.overflow_cap, 1000);
        assert_eq!(config.handoff.max_attempts, 40);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.compile.height = 250;
        config.bins.overflow_cap = 64;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded = Config::load_from_file(temp_file.path())?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.bins.overflow_cap, 64);

        Ok(())
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() -> Result<()> {
        let config: Config = toml::from_str("[handoff]\ninterval_ms = 100\n")?;
        assert_eq!(config.handoff.interval_ms, 100);
        assert_eq!(config.handoff.max_attempts, 40);
        assert_eq!(config.compile, CompileOptions::default());
        Ok(())
    }

    #[test]
    fn test_example_toml_generation() -> Result<()> {
        let example = Config::default().to_toml()?;
        assert!(example.contains("[compile]"));
        assert!(example.contains("[bins]"));
        assert!(example.contains("[handoff]"));
        Ok(())
    }
}
