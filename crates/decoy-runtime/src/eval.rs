//! Evaluation sample producer.
//!
//! Builds a dense candidate list over the whole entity vocabulary for
//! filtered ranking. A candidate that would reproduce another known-true
//! triple gets bias [`FILTER_BIAS`] and its id is replaced by the true
//! entity; every other candidate keeps its own id with bias 0. The true
//! entity's own slot is always kept.

use crate::loader::{BatchLoader, SampleDataset};
use decoy_core::error::{DecoyError, Result};
use decoy_core::index::TripleSet;
use decoy_core::types::{CorruptionMode, EntityId, RelationId, Triple};
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Bias marking a candidate to exclude from ranking metrics.
pub const FILTER_BIAS: f32 = -100.0;

/// One test triple with its full candidate list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationExample {
    pub positive_entity: EntityId,
    pub replaced_entity: EntityId,
    pub relation: RelationId,
    /// `nentity` candidate ids for the corrupted slot.
    pub negative_sample: Vec<EntityId>,
    /// 0 to keep, [`FILTER_BIAS`] to exclude, aligned with `negative_sample`.
    pub filter_bias: Vec<f32>,
    pub sign: f32,
    pub mode: CorruptionMode,
}

impl EvaluationExample {
    /// Number of candidates excluded from ranking.
    pub fn filtered_count(&self) -> usize {
        self.filter_bias.iter().filter(|&&b| b != 0.0).count()
    }
}

/// Test triples scored against every entity on one fixed side.
#[derive(Debug, Clone)]
pub struct TestDataset {
    triples: Vec<Triple>,
    all_true: Arc<TripleSet>,
    nentity: usize,
    mode: CorruptionMode,
}

impl TestDataset {
    /// `all_true` is usually train ∪ valid ∪ test.
    pub fn new(
        triples: Vec<Triple>,
        all_true: Arc<TripleSet>,
        nentity: usize,
        mode: CorruptionMode,
    ) -> Self {
        Self {
            triples,
            all_true,
            nentity,
            mode,
        }
    }

    /// Like [`new`](Self::new) with the mode given as a string.
    pub fn with_mode_str(
        triples: Vec<Triple>,
        all_true: Arc<TripleSet>,
        nentity: usize,
        mode: &str,
    ) -> Result<Self> {
        Ok(Self::new(triples, all_true, nentity, mode.parse()?))
    }

    pub fn mode(&self) -> CorruptionMode {
        self.mode
    }

    pub fn nentity(&self) -> usize {
        self.nentity
    }

    /// Example for `index` on this dataset's side.
    pub fn get(&self, index: usize) -> Result<EvaluationExample> {
        self.get_with_mode(index, self.mode)
    }

    /// Example for `index` with the corrupted side given explicitly.
    pub fn get_with_mode(&self, index: usize, mode: CorruptionMode) -> Result<EvaluationExample> {
        let triple = self.triples.get(index).copied().ok_or(DecoyError::IndexOutOfRange {
            index,
            len: self.triples.len(),
        })?;
        let (positive_entity, replaced_entity) = mode.split(&triple);

        let mut negative_sample = Vec::with_capacity(self.nentity);
        let mut filter_bias = Vec::with_capacity(self.nentity);

        for candidate in 0..self.nentity as EntityId {
            let is_other_truth = candidate != replaced_entity
                && self.all_true.contains(&triple.corrupt(mode, candidate));
            if is_other_truth {
                negative_sample.push(replaced_entity);
                filter_bias.push(FILTER_BIAS);
            } else {
                negative_sample.push(candidate);
                filter_bias.push(0.0);
            }
        }

        Ok(EvaluationExample {
            positive_entity,
            replaced_entity,
            relation: triple.relation,
            negative_sample,
            filter_bias,
            sign: mode.sign(),
            mode,
        })
    }
}

impl SampleDataset for TestDataset {
    type Example = EvaluationExample;

    fn len(&self) -> usize {
        self.triples.len()
    }

    fn sample(&self, index: usize, _step: u64, _rng: &mut StdRng) -> Result<EvaluationExample> {
        self.get(index)
    }
}

/// Unshuffled (head-batch, tail-batch) loaders over `triples`.
pub fn evaluation_loaders(
    triples: &[Triple],
    all_true: Arc<TripleSet>,
    nentity: usize,
    batch_size: usize,
) -> (BatchLoader<TestDataset>, BatchLoader<TestDataset>) {
    info!(
        triples = triples.len(),
        nentity,
        filter_set = all_true.len(),
        batch_size,
        "built evaluation loaders"
    );

    let loader = |mode: CorruptionMode| {
        let dataset = TestDataset::new(triples.to_vec(), Arc::clone(&all_true), nentity, mode);
        BatchLoader::new(Arc::new(dataset), batch_size).with_shuffle(false)
    };
    (
        loader(CorruptionMode::HeadBatch),
        loader(CorruptionMode::TailBatch),
    )
}
