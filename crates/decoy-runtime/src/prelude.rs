//! Decoy Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use decoy_runtime::prelude::*;
//! ```

pub use crate::batch::{Collate, TestBatch, TrainBatch};
pub use crate::config::{SamplerConfig, SideStrategyKind};
pub use crate::corpus::KgCorpus;
pub use crate::eval::{evaluation_loaders, EvaluationExample, TestDataset, FILTER_BIAS};
pub use crate::graph::{GraphStats, KnowledgeGraph};
pub use crate::loader::{BatchLoader, BatchSource, SampleDataset};
pub use crate::sampler::{NegativeSampler, DEFAULT_MAX_ROUNDS};
pub use crate::side::{select_side, SideStrategy, DEFAULT_SIDE_THRESHOLD};
pub use crate::step::StepCounter;
pub use crate::stream::{BidirectionalStream, OneShotStream};
pub use crate::train::{training_stream, TrainDataset, TrainLoader, TrainStream, TrainingExample};
