//! # Decoy Runtime
//!
//! Turns a knowledge graph into an endless, reproducible stream of
//! training batches.
//!
//! Data flows leaves-first:
//!
//! 1. [`graph::KnowledgeGraph`] builds the frequency table, true-triple
//!    index and tph/hpt ratios once.
//! 2. [`train::TrainDataset`] and [`eval::TestDataset`] produce one
//!    example per index, drawing negatives through
//!    [`sampler::NegativeSampler`].
//! 3. [`loader::BatchLoader`] shuffles indices and collates examples into
//!    [`batch::TrainBatch`] / [`batch::TestBatch`].
//! 4. [`stream::BidirectionalStream`] alternates two restarting loaders.

pub mod config;
pub mod graph;
pub mod step;
pub mod sampler;
pub mod side;
pub mod train;
pub mod eval;
pub mod batch;
pub mod loader;
pub mod stream;
pub mod corpus;
pub mod prelude;
