//! Configuration management for Decoy CLI.

use anyhow::{Context, Result};
use decoy::prelude::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "decoy.toml";

/// Decoy project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sampling: SamplerConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_eval_batch_size")]
    pub batch_size: usize,
}

fn default_eval_batch_size() -> usize { 16 }

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_eval_batch_size(),
        }
    }
}

impl Config {
    /// Load config from decoy.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .sampling
            .validate()
            .with_context(|| format!("Invalid [sampling] in {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find decoy.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy::prelude::SideStrategyKind;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [sampling]
            negative_sample_size = 64
            side_strategy = "uniform"
            "#,
        )
        .unwrap();

        assert_eq!(config.sampling.negative_sample_size, 64);
        assert_eq!(config.sampling.side_strategy, SideStrategyKind::Uniform);
        assert_eq!(config.sampling.batch_size, 1024);
        assert_eq!(config.evaluation.batch_size, 16);
    }

    #[test]
    fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.sampling.seed = 7;
        config.save(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[sampling]\nbatch_size = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("batch_size"));
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[sampling]\nside_strategy = \"sideways\"\n");
        assert!(result.is_err());
    }
}
