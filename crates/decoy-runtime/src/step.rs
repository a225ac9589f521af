//! Shared training step counter.
//!
//! The training loop owns the counter and advances it; datasets and
//! loaders hold clones and only read it. Side selection is a pure function
//! of the step it is handed, so no dataset carries a mutable mode.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cloneable handle to one monotonically increasing step value.
#[derive(Debug, Clone, Default)]
pub struct StepCounter(Arc<AtomicU64>);

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(step: u64) -> Self {
        Self(Arc::new(AtomicU64::new(step)))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Increment and return the new step.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Jump to an explicit step, e.g. when resuming from a checkpoint.
    pub fn set(&self, step: u64) {
        self.0.store(step, Ordering::Release);
    }
}
