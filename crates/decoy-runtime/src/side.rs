//! Corruption-side selection.
//!
//! For skewed relations the side with more alternatives is corrupted on
//! every `period`-th step and the other side otherwise, where
//! `period = min(floor(1 + major / minor), threshold)`.

use decoy_core::ratios::RelationCardinality;
use decoy_core::types::CorruptionMode;
use serde::{Deserialize, Serialize};

/// Cap on the alternation period.
pub const DEFAULT_SIDE_THRESHOLD: u64 = 2;

/// Pick the corrupted side for one example at `step`.
///
/// Pure function of its inputs; two calls with the same arguments always
/// agree.
pub fn select_side(step: u64, hpt: f64, tph: f64, threshold: u64) -> CorruptionMode {
    let (ratio, on_period) = if hpt < tph {
        (tph / hpt, CorruptionMode::HeadBatch)
    } else {
        (hpt / tph, CorruptionMode::TailBatch)
    };

    let period = ((1.0 + ratio).floor() as u64).min(threshold).max(1);

    if step % period == 0 {
        on_period
    } else {
        on_period.opposite()
    }
}

/// How a training dataset chooses the corrupted side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideStrategy {
    /// [`select_side`] with the relation's hpt/tph.
    Biased { threshold: u64 },
    /// Always the given side.
    Fixed(CorruptionMode),
}

impl Default for SideStrategy {
    fn default() -> Self {
        SideStrategy::Biased {
            threshold: DEFAULT_SIDE_THRESHOLD,
        }
    }
}

impl SideStrategy {
    pub fn choose(&self, step: u64, cardinality: &RelationCardinality) -> CorruptionMode {
        match *self {
            SideStrategy::Biased { threshold } => {
                select_side(step, cardinality.hpt, cardinality.tph, threshold)
            }
            SideStrategy::Fixed(mode) => mode,
        }
    }
}
