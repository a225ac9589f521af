//! # Decoy
//!
//! Filtered negative sampling and batching for knowledge graph embedding
//! training.
//!
//! Decoy turns a set of `(head, relation, tail)` triples into an endless
//! stream of training batches. Each positive triple is paired with
//! corrupted copies whose replaced entity is guaranteed not to form another
//! known-true triple, weighted by how common its head/tail patterns are.
//!
//! ## Quick Start
//!
//! ```rust
//! use decoy::prelude::*;
//! use std::sync::Arc;
//!
//! let triples = vec![
//!     Triple::new(0, 0, 1),
//!     Triple::new(0, 0, 2),
//!     Triple::new(3, 1, 2),
//!     Triple::new(4, 1, 2),
//! ];
//! let graph = Arc::new(KnowledgeGraph::build(triples, 6, 2).unwrap());
//!
//! let config = SamplerConfig::default()
//!     .with_batch_size(2)
//!     .with_negative_sample_size(3);
//! let steps = StepCounter::new();
//! let mut stream = training_stream(graph, &config, steps.clone()).unwrap();
//!
//! for _ in 0..4 {
//!     let batch = stream.next_batch().unwrap();
//!     assert_eq!(batch.negative_sample.ncols(), 3);
//!     steps.advance();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`decoy_core`] - Triples, keys, the true-triple index, frequency
//!   table and relation cardinality statistics
//! - [`decoy_runtime`] - Sampler, datasets, batch loader and streams
//!
//! ## Key Concepts
//!
//! ### Corruption Modes
//!
//! | Mode | Replaced | Kept | Sign |
//! |------|----------|------|------|
//! | `head-batch` | head | tail | -1 |
//! | `tail-batch` | tail | head | +1 |
//!
//! ### Side Selection
//!
//! For a relation where heads have many tails (high tph) the head side has
//! fewer alternatives; the biased strategy corrupts it on every
//! `period`-th step, with `period = min(floor(1 + tph / hpt), threshold)`.
//!
//! ### Subsampling Weight
//!
//! Each `(head, relation)` and `(tail, inverse relation)` pair is counted
//! starting at 4. A triple's weight is `sqrt(1 / (count_h + count_t))`, so
//! frequent patterns contribute less to the loss.
//!
//! ## Evaluation
//!
//! ```rust
//! use decoy::prelude::*;
//! use std::sync::Arc;
//!
//! let test = vec![Triple::new(0, 0, 1)];
//! let all_true = Arc::new(TripleSet::new(&[Triple::new(0, 0, 1), Triple::new(0, 0, 2)]));
//! let (heads, mut tails) = evaluation_loaders(&test, all_true, 4, 16);
//!
//! let batch = tails.next().unwrap().unwrap();
//! assert_eq!(batch.filter_bias.row(0).to_vec(), vec![0.0, 0.0, FILTER_BIAS, 0.0]);
//! # drop(heads);
//! ```

pub use decoy_core as core;
pub use decoy_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use decoy::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use decoy_core::types::{
        EntityId, RelationId,
        Triple, HeadRelation, RelationTail, PartialKey,
        CorruptionMode,
    };

    // Statistics
    pub use decoy_core::frequency::{FrequencyTable, DEFAULT_FREQUENCY_START};
    pub use decoy_core::index::{TripleSet, TrueTripleIndex};
    pub use decoy_core::ratios::{RelationCardinality, RelationRatios};

    // Error types
    pub use decoy_core::error::{DecoyError, Result};

    // Runtime
    pub use decoy_runtime::config::{SamplerConfig, SideStrategyKind};
    pub use decoy_runtime::corpus::KgCorpus;
    pub use decoy_runtime::graph::{GraphStats, KnowledgeGraph};
    pub use decoy_runtime::sampler::{NegativeSampler, DEFAULT_MAX_ROUNDS};
    pub use decoy_runtime::side::{select_side, SideStrategy, DEFAULT_SIDE_THRESHOLD};
    pub use decoy_runtime::step::StepCounter;

    // Datasets and batching
    pub use decoy_runtime::train::{
        training_stream, TrainDataset, TrainLoader, TrainStream, TrainingExample,
    };
    pub use decoy_runtime::eval::{
        evaluation_loaders, EvaluationExample, TestDataset, FILTER_BIAS,
    };
    pub use decoy_runtime::batch::{Collate, TestBatch, TrainBatch};
    pub use decoy_runtime::loader::{BatchLoader, BatchSource, SampleDataset};
    pub use decoy_runtime::stream::{BidirectionalStream, OneShotStream};
}
