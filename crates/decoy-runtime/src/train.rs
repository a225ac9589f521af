//! Training sample producer.
//!
//! For the triple at `index` and the current step:
//! 1. subsampling weight from the frequency table
//! 2. corrupted side from the [`SideStrategy`]
//! 3. filtered negatives from the [`NegativeSampler`]
//!
//! The chosen mode travels inside the returned example, so one dataset can
//! serve concurrent loaders without sharing mutable state.

use crate::config::SamplerConfig;
use crate::graph::KnowledgeGraph;
use crate::loader::{BatchLoader, SampleDataset};
use crate::sampler::NegativeSampler;
use crate::side::SideStrategy;
use crate::step::StepCounter;
use crate::stream::BidirectionalStream;
use decoy_core::error::Result;
use decoy_core::types::{CorruptionMode, EntityId, RelationId};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// One positive triple with its negatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingExample {
    /// Entity kept from the positive triple.
    pub positive_entity: EntityId,
    /// Entity on the corrupted side of the positive triple.
    pub replaced_entity: EntityId,
    pub relation: RelationId,
    /// Replacements for `replaced_entity`, none of them forming a known triple.
    pub negative_sample: Vec<EntityId>,
    pub subsampling_weight: f32,
    /// -1 for head corruption, +1 for tail corruption.
    pub sign: f32,
    pub mode: CorruptionMode,
}

/// Indexed access to training examples over a shared [`KnowledgeGraph`].
#[derive(Debug, Clone)]
pub struct TrainDataset {
    graph: Arc<KnowledgeGraph>,
    sampler: NegativeSampler,
    negative_sample_size: usize,
    strategy: SideStrategy,
}

impl TrainDataset {
    pub fn new(graph: Arc<KnowledgeGraph>, negative_sample_size: usize) -> Self {
        let sampler = NegativeSampler::new(graph.nentity());
        Self {
            graph,
            sampler,
            negative_sample_size,
            strategy: SideStrategy::default(),
        }
    }

    pub fn from_config(
        graph: Arc<KnowledgeGraph>,
        config: &SamplerConfig,
        strategy: SideStrategy,
    ) -> Self {
        Self::new(graph, config.negative_sample_size)
            .with_strategy(strategy)
            .with_max_rounds(config.max_rounds)
    }

    pub fn with_strategy(mut self, strategy: SideStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.sampler = self.sampler.with_max_rounds(max_rounds);
        self
    }

    pub fn graph(&self) -> &Arc<KnowledgeGraph> {
        &self.graph
    }

    pub fn strategy(&self) -> SideStrategy {
        self.strategy
    }

    pub fn negative_sample_size(&self) -> usize {
        self.negative_sample_size
    }

    /// Corrupted side for the triple at `index` at `step`.
    pub fn side_for(&self, index: usize, step: u64) -> Result<CorruptionMode> {
        let triple = self.graph.triple(index)?;
        if let SideStrategy::Fixed(mode) = self.strategy {
            return Ok(mode);
        }
        let card = self.graph.cardinality(triple.relation)?;
        Ok(self.strategy.choose(step, &card))
    }

    /// Build the example for `index` at `step`.
    pub fn get<R: Rng + ?Sized>(
        &self,
        index: usize,
        step: u64,
        rng: &mut R,
    ) -> Result<TrainingExample> {
        let triple = self.graph.triple(index)?;
        let subsampling_weight = self.graph.frequency().subsampling_weight(&triple);
        let mode = self.side_for(index, step)?;

        let negative_sample = self.sampler.sample_for(
            rng,
            self.graph.index(),
            mode,
            &triple,
            self.negative_sample_size,
        )?;

        let (positive_entity, replaced_entity) = mode.split(&triple);

        Ok(TrainingExample {
            positive_entity,
            replaced_entity,
            relation: triple.relation,
            negative_sample,
            subsampling_weight,
            sign: mode.sign(),
            mode,
        })
    }
}

impl SampleDataset for TrainDataset {
    type Example = TrainingExample;

    fn len(&self) -> usize {
        self.graph.len()
    }

    fn sample(&self, index: usize, step: u64, rng: &mut StdRng) -> Result<TrainingExample> {
        self.get(index, step, rng)
    }
}

/// Loader over a [`TrainDataset`].
pub type TrainLoader = BatchLoader<TrainDataset>;

/// Two training loaders merged into one alternating stream.
pub type TrainStream = BidirectionalStream<TrainLoader, TrainLoader>;

/// Build the alternating training stream described by `config`.
///
/// Both loaders read `steps`; the caller advances it once per consumed
/// batch. The second loader is seeded with `seed + 1` so the two shuffle
/// orders differ.
pub fn training_stream(
    graph: Arc<KnowledgeGraph>,
    config: &SamplerConfig,
    steps: StepCounter,
) -> Result<TrainStream> {
    config.validate()?;
    let (first, second) = config.strategies();

    let loader = |strategy: SideStrategy, seed: u64| {
        let dataset = TrainDataset::from_config(Arc::clone(&graph), config, strategy);
        BatchLoader::new(Arc::new(dataset), config.batch_size)
            .with_shuffle(config.shuffle)
            .with_seed(seed)
            .with_step_counter(steps.clone())
    };

    info!(
        triples = graph.len(),
        batch_size = config.batch_size,
        negative_sample_size = config.negative_sample_size,
        strategy = ?config.side_strategy,
        "built training stream"
    );

    Ok(BidirectionalStream::new(
        loader(first, config.seed),
        loader(second, config.seed.wrapping_add(1)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_core::types::{HeadRelation, RelationTail, Triple};
    use rand::SeedableRng;

    fn small_graph() -> Arc<KnowledgeGraph> {
        let triples = vec![Triple::new(0, 0, 1), Triple::new(1, 0, 2), Triple::new(0, 1, 2)];
        Arc::new(KnowledgeGraph::build(triples, 3, 2).unwrap())
    }

    #[test]
    fn example_fields_follow_mode() {
        let dataset = TrainDataset::new(small_graph(), 1);
        let mut rng = StdRng::seed_from_u64(3);

        // relation 0 is balanced, so step 0 takes the tail branch
        let ex = dataset.get(0, 0, &mut rng).unwrap();
        assert_eq!(ex.mode, CorruptionMode::TailBatch);
        assert_eq!(ex.sign, 1.0);
        assert_eq!((ex.positive_entity, ex.replaced_entity, ex.relation), (0, 1, 0));
        assert_eq!(ex.negative_sample.len(), 1);
        assert_ne!(ex.negative_sample[0], 1, "true tail leaked into negatives");

        let ex = dataset.get(0, 1, &mut rng).unwrap();
        assert_eq!(ex.mode, CorruptionMode::HeadBatch);
        assert_eq!(ex.sign, -1.0);
        assert_eq!((ex.positive_entity, ex.replaced_entity), (1, 0));
        assert_ne!(ex.negative_sample[0], 0);
    }

    #[test]
    fn subsampling_weight_uses_both_partial_counts() {
        let dataset = TrainDataset::new(small_graph(), 1);
        let mut rng = StdRng::seed_from_u64(0);
        let ex = dataset.get(2, 0, &mut rng).unwrap();
        assert!((ex.subsampling_weight - (1.0f32 / 8.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn negatives_avoid_true_set() {
        let mut triples: Vec<Triple> = (1..40).map(|t| Triple::new(0, 0, t)).collect();
        triples.extend((1..10).map(|h| Triple::new(h, 1, 0)));
        let graph = Arc::new(KnowledgeGraph::build(triples, 50, 2).unwrap());
        let dataset = TrainDataset::new(Arc::clone(&graph), 16);
        let mut rng = StdRng::seed_from_u64(11);

        for step in 0..6 {
            for index in 0..dataset.len() {
                let ex = dataset.get(index, step, &mut rng).unwrap();
                let triple = graph.triple(index).unwrap();
                let truth = match ex.mode {
                    CorruptionMode::HeadBatch => graph.index().true_heads(RelationTail::new(triple.relation, triple.tail)),
                    CorruptionMode::TailBatch => graph.index().true_tails(HeadRelation::new(triple.head, triple.relation)),
                };
                assert_eq!(ex.negative_sample.len(), 16);
                assert!(ex.negative_sample.iter().all(|e| !truth.contains(e)));
            }
        }
    }

    #[test]
    fn fixed_strategy_pins_mode() {
        let dataset = TrainDataset::new(small_graph(), 2)
            .with_strategy(SideStrategy::Fixed(CorruptionMode::HeadBatch));
        let mut rng = StdRng::seed_from_u64(1);
        for step in 0..4 {
            let ex = dataset.get(1, step, &mut rng).unwrap();
            assert_eq!(ex.mode, CorruptionMode::HeadBatch);
            assert_eq!(ex.replaced_entity, 1);
        }
    }

    #[test]
    fn side_is_pure_in_index_and_step() {
        let dataset = TrainDataset::new(small_graph(), 1);
        for step in 0..10 {
            for index in 0..3 {
                assert_eq!(
                    dataset.side_for(index, step).unwrap(),
                    dataset.side_for(index, step).unwrap()
                );
            }
        }
    }

    #[test]
    fn out_of_range_index_errors() {
        let dataset = TrainDataset::new(small_graph(), 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(dataset.get(3, 0, &mut rng).is_err());
    }
}
