//! Generic batch loader.
//!
//! Given a dataset with indexed access and a batch size, yields one epoch
//! of shuffled, collated batches. [`BatchSource`] is the seam the streams
//! in [`crate::stream`] restart through.

use crate::batch::Collate;
use crate::step::StepCounter;
use decoy_core::error::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// A dataset the loader can draw examples from.
pub trait SampleDataset: Send + Sync {
    type Example: Collate;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Example at `index` for training step `step`.
    fn sample(&self, index: usize, step: u64, rng: &mut StdRng) -> Result<Self::Example>;
}

/// Finite, restartable sequence of batches.
pub trait BatchSource {
    type Batch;

    /// Next batch of the current pass, or `None` when the pass is done.
    fn next_batch(&mut self) -> Option<Result<Self::Batch>>;

    /// Start a new pass from the beginning.
    fn reset(&mut self);
}

/// Batch type produced by a loader over `D`.
pub type BatchOf<D> = <<D as SampleDataset>::Example as Collate>::Batch;

/// Shuffling batch loader over a shared dataset.
///
/// Keeps the last partial batch. The step counter is read once per batch,
/// so every example in a batch sees the same step.
pub struct BatchLoader<D: SampleDataset> {
    dataset: Arc<D>,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
    order: Vec<usize>,
    cursor: usize,
    epoch: u64,
    steps: StepCounter,
}

impl<D: SampleDataset> BatchLoader<D> {
    pub fn new(dataset: Arc<D>, batch_size: usize) -> Self {
        let mut loader = Self {
            dataset,
            batch_size: batch_size.max(1),
            shuffle: true,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            order: Vec::new(),
            cursor: 0,
            epoch: 0,
            steps: StepCounter::new(),
        };
        loader.reorder();
        loader
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.reorder();
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self.reorder();
        self
    }

    pub fn with_step_counter(mut self, steps: StepCounter) -> Self {
        self.steps = steps;
        self
    }

    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Completed passes so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Batches per pass.
    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    fn reorder(&mut self) {
        self.order = (0..self.dataset.len()).collect();
        if self.shuffle {
            self.order.shuffle(&mut self.rng);
        }
        self.cursor = 0;
    }
}

impl<D: SampleDataset> BatchSource for BatchLoader<D> {
    type Batch = BatchOf<D>;

    fn next_batch(&mut self) -> Option<Result<Self::Batch>> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.order.len());
        let step = self.steps.get();

        let mut examples = Vec::with_capacity(end - self.cursor);
        for &index in &self.order[self.cursor..end] {
            match self.dataset.sample(index, step, &mut self.rng) {
                Ok(example) => examples.push(example),
                Err(e) => {
                    self.cursor = end;
                    return Some(Err(e));
                }
            }
        }
        self.cursor = end;

        Some(D::Example::collate(examples))
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.reorder();
    }
}

impl<D: SampleDataset> Iterator for BatchLoader<D> {
    type Item = Result<BatchOf<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::KnowledgeGraph;
    use crate::train::TrainDataset;
    use decoy_core::types::Triple;
    use std::collections::HashSet;

    fn dataset(n: u32) -> Arc<TrainDataset> {
        let triples: Vec<Triple> = (0..n).map(|i| Triple::new(i, 0, (i + 1) % n)).collect();
        let graph = Arc::new(KnowledgeGraph::build(triples, n as usize, 1).unwrap());
        Arc::new(TrainDataset::new(graph, 3))
    }

    #[test]
    fn one_pass_covers_every_triple_once() {
        let mut loader = BatchLoader::new(dataset(10), 4);
        assert_eq!(loader.num_batches(), 3);

        let batches: Vec<_> = (&mut loader).map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![4, 4, 2]);

        let heads_or_tails: HashSet<(u32, u32)> = batches
            .iter()
            .flat_map(|b| {
                b.positive_entity
                    .iter()
                    .zip(b.replaced_entity.iter())
                    .map(|(&p, &r)| (p.min(r), p.max(r)))
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(heads_or_tails.len(), 10);
        assert!(loader.next_batch().is_none());
    }

    #[test]
    fn reset_starts_new_epoch() {
        let mut loader = BatchLoader::new(dataset(5), 5);
        assert!(loader.next_batch().is_some());
        assert!(loader.next_batch().is_none());

        loader.reset();
        assert_eq!(loader.epoch(), 1);
        assert!(loader.next_batch().is_some());
    }

    #[test]
    fn unshuffled_order_is_sequential() {
        let mut loader = BatchLoader::new(dataset(6), 6).with_shuffle(false);
        let batch = loader.next_batch().unwrap().unwrap();
        let heads_in_order: Vec<u32> = (0..6)
            .map(|i| batch.positive_entity[i].min(batch.replaced_entity[i]))
            .collect();
        assert_eq!(heads_in_order, vec![0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn batch_reads_shared_step() {
        let steps = StepCounter::new();
        let mut loader = BatchLoader::new(dataset(4), 4)
            .with_shuffle(false)
            .with_step_counter(steps.clone());

        // balanced relation: even step corrupts tails, odd step heads
        let batch = loader.next_batch().unwrap().unwrap();
        assert!(batch.sign.iter().all(|&s| s == 1.0));

        steps.advance();
        loader.reset();
        let batch = loader.next_batch().unwrap().unwrap();
        assert!(batch.sign.iter().all(|&s| s == -1.0));
    }

    #[test]
    fn same_seed_same_batches() {
        let a: Vec<_> = BatchLoader::new(dataset(12), 5).with_seed(7).map(|b| b.unwrap()).collect();
        let b: Vec<_> = BatchLoader::new(dataset(12), 5).with_seed(7).map(|b| b.unwrap()).collect();
        assert_eq!(a, b);
    }
}
