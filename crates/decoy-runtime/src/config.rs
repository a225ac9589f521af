//! Sampler configuration.
//!
//! Every field has a default so partial TOML/JSON documents deserialize.

use crate::side::{SideStrategy, DEFAULT_SIDE_THRESHOLD};
use crate::sampler::DEFAULT_MAX_ROUNDS;
use decoy_core::error::{DecoyError, Result};
use decoy_core::frequency::DEFAULT_FREQUENCY_START;
use decoy_core::types::CorruptionMode;
use serde::{Deserialize, Serialize};

/// How the training streams choose the corrupted side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideStrategyKind {
    /// Cardinality-biased alternation driven by the step counter.
    #[default]
    Biased,
    /// One stream always corrupts heads, the other always tails.
    Uniform,
}

/// Parameters for building training loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_negative_sample_size")]
    pub negative_sample_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_frequency_start")]
    pub frequency_start: u32,
    #[serde(default = "default_side_threshold")]
    pub side_threshold: u64,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub side_strategy: SideStrategyKind,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

// Default value functions
fn default_negative_sample_size() -> usize { 256 }
fn default_batch_size() -> usize { 1024 }
fn default_frequency_start() -> u32 { DEFAULT_FREQUENCY_START }
fn default_side_threshold() -> u64 { DEFAULT_SIDE_THRESHOLD }
fn default_max_rounds() -> usize { DEFAULT_MAX_ROUNDS }
fn default_seed() -> u64 { 42 }
fn default_shuffle() -> bool { true }

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            negative_sample_size: default_negative_sample_size(),
            batch_size: default_batch_size(),
            frequency_start: default_frequency_start(),
            side_threshold: default_side_threshold(),
            max_rounds: default_max_rounds(),
            seed: default_seed(),
            side_strategy: SideStrategyKind::default(),
            shuffle: default_shuffle(),
        }
    }
}

impl SamplerConfig {
    pub fn with_negative_sample_size(mut self, n: usize) -> Self {
        self.negative_sample_size = n;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_side_strategy(mut self, kind: SideStrategyKind) -> Self {
        self.side_strategy = kind;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DecoyError::invalid_config("batch_size", 0, "must be at least 1"));
        }
        if self.side_threshold == 0 {
            return Err(DecoyError::invalid_config("side_threshold", 0, "must be at least 1"));
        }
        if self.max_rounds == 0 {
            return Err(DecoyError::invalid_config("max_rounds", 0, "must be at least 1"));
        }
        Ok(())
    }

    /// Side strategies for the (first, second) training streams.
    pub fn strategies(&self) -> (SideStrategy, SideStrategy) {
        match self.side_strategy {
            SideStrategyKind::Biased => {
                let biased = SideStrategy::Biased {
                    threshold: self.side_threshold,
                };
                (biased, biased)
            }
            SideStrategyKind::Uniform => (
                SideStrategy::Fixed(CorruptionMode::HeadBatch),
                SideStrategy::Fixed(CorruptionMode::TailBatch),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{"negative_sample_size": 8, "side_strategy": "uniform"}"#).unwrap();
        assert_eq!(config.negative_sample_size, 8);
        assert_eq!(config.batch_size, 1024);
        assert_eq!(config.frequency_start, 4);
        assert_eq!(config.side_threshold, 2);
        assert_eq!(config.side_strategy, SideStrategyKind::Uniform);
    }

    #[test]
    fn validation_rejects_zeroes() {
        assert!(SamplerConfig::default().validate().is_ok());
        let bad = SamplerConfig::default().with_batch_size(0);
        assert!(matches!(
            bad.validate(),
            Err(DecoyError::InvalidConfig { field, .. }) if field == "batch_size"
        ));
        let bad = SamplerConfig {
            side_threshold: 0,
            ..SamplerConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn uniform_strategy_splits_sides() {
        let config = SamplerConfig::default().with_side_strategy(SideStrategyKind::Uniform);
        let (first, second) = config.strategies();
        assert_eq!(first, SideStrategy::Fixed(CorruptionMode::HeadBatch));
        assert_eq!(second, SideStrategy::Fixed(CorruptionMode::TailBatch));
    }
}
