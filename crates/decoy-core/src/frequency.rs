//! Partial-triple frequencies for word2vec-style subsampling.
//!
//! Counts how often each (head, relation) and (tail, inverse relation)
//! pair occurs. The first occurrence of a key stores the start value and
//! every further occurrence adds one, so the start value acts as a
//! smoothing floor.

use crate::types::{PartialKey, Triple};
use std::collections::HashMap;

/// Start value used when no other is configured.
pub const DEFAULT_FREQUENCY_START: u32 = 4;

/// Smoothed counts keyed by [`PartialKey`]. Immutable once built.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: HashMap<PartialKey, u32>,
    start: u32,
}

impl FrequencyTable {
    /// Count frequencies with the default start value.
    pub fn build(triples: &[Triple]) -> Self {
        Self::with_start(triples, DEFAULT_FREQUENCY_START)
    }

    /// Count frequencies with an explicit start value.
    pub fn with_start(triples: &[Triple], start: u32) -> Self {
        let mut counts: HashMap<PartialKey, u32> = HashMap::new();

        for triple in triples {
            for key in [
                PartialKey::head_side(triple.head, triple.relation),
                PartialKey::tail_side(triple.tail, triple.relation),
            ] {
                counts
                    .entry(key)
                    .and_modify(|c| *c += 1)
                    .or_insert(start);
            }
        }

        Self { counts, start }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    /// Stored count, if the key was seen.
    pub fn get(&self, key: &PartialKey) -> Option<u32> {
        self.counts.get(key).copied()
    }

    /// Stored count, or the start value for unseen keys.
    pub fn count(&self, key: &PartialKey) -> u32 {
        self.get(key).unwrap_or(self.start)
    }

    /// `sqrt(1 / (freq(h, r) + freq(t, -r-1)))`.
    ///
    /// Higher combined frequency gives a lower weight.
    pub fn subsampling_weight(&self, triple: &Triple) -> f32 {
        let head = self.count(&PartialKey::head_side(triple.head, triple.relation));
        let tail = self.count(&PartialKey::tail_side(triple.tail, triple.relation));
        weight_from_count(head as u64 + tail as u64)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartialKey, &u32)> {
        self.counts.iter()
    }

    /// Number of (head-side, tail-side) keys.
    pub fn side_counts(&self) -> (usize, usize) {
        let tail = self.counts.keys().filter(|k| k.is_inverse()).count();
        (self.counts.len() - tail, tail)
    }
}

/// Subsampling weight for a combined partial-triple count.
pub fn weight_from_count(combined: u64) -> f32 {
    (1.0 / combined as f64).sqrt() as f32
}
