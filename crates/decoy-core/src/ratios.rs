//! Per-relation cardinality: tails-per-head (tph) and heads-per-tail (hpt).
//!
//! Derived from the sizes of the [`TrueTripleIndex`] arrays, so the index
//! must be built first.

use crate::index::TrueTripleIndex;
use crate::types::RelationId;
use serde::Serialize;
use std::collections::HashMap;

/// tph and hpt for one relation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelationCardinality {
    pub relation: RelationId,
    pub tph: f64,
    pub hpt: f64,
}

impl RelationCardinality {
    /// Ratio of the larger average to the smaller, always >= 1.
    pub fn skew(&self) -> f64 {
        let (major, minor) = if self.hpt < self.tph {
            (self.tph, self.hpt)
        } else {
            (self.hpt, self.tph)
        };
        major / minor
    }
}

/// tph/hpt for every relation seen in the index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationRatios {
    tph: HashMap<RelationId, f64>,
    hpt: HashMap<RelationId, f64>,
}

impl RelationRatios {
    pub fn from_index(index: &TrueTripleIndex) -> Self {
        // relation -> (distinct keys, total entities under those keys)
        let mut tail_side: HashMap<RelationId, (usize, usize)> = HashMap::new();
        for (key, tails) in index.tail_entries() {
            let entry = tail_side.entry(key.relation).or_default();
            entry.0 += 1;
            entry.1 += tails.len();
        }

        let mut head_side: HashMap<RelationId, (usize, usize)> = HashMap::new();
        for (key, heads) in index.head_entries() {
            let entry = head_side.entry(key.relation).or_default();
            entry.0 += 1;
            entry.1 += heads.len();
        }

        let average = |m: HashMap<RelationId, (usize, usize)>| {
            m.into_iter()
                .map(|(r, (keys, total))| (r, total as f64 / keys as f64))
                .collect::<HashMap<_, _>>()
        };

        Self {
            tph: average(tail_side),
            hpt: average(head_side),
        }
    }

    /// Average number of true tails per distinct head.
    pub fn tph(&self, relation: RelationId) -> Option<f64> {
        self.tph.get(&relation).copied()
    }

    /// Average number of true heads per distinct tail.
    pub fn hpt(&self, relation: RelationId) -> Option<f64> {
        self.hpt.get(&relation).copied()
    }

    pub fn get(&self, relation: RelationId) -> Option<RelationCardinality> {
        Some(RelationCardinality {
            relation,
            tph: self.tph(relation)?,
            hpt: self.hpt(relation)?,
        })
    }

    /// All relations with statistics, in ascending id order.
    pub fn relations(&self) -> Vec<RelationId> {
        let mut relations: Vec<RelationId> = self.tph.keys().copied().collect();
        relations.sort_unstable();
        relations
    }

    pub fn len(&self) -> usize {
        self.tph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tph.is_empty()
    }
}
