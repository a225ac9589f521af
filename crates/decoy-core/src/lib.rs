//! # Decoy Core
//!
//! Core types and one-time statistics for knowledge graph negative sampling.
//!
//! Everything in this crate is built once from a triple list and is
//! read-only afterwards, so it can be shared freely between loaders:
//!
//! - **TripleSet** - O(1) membership test for known-true triples
//! - **TrueTripleIndex** - valid heads per (relation, tail), valid tails per (head, relation)
//! - **FrequencyTable** - smoothed partial-triple counts for subsampling weights
//! - **RelationRatios** - average tails-per-head (tph) and heads-per-tail (hpt)
//!
//! ## Quick Start
//!
//! ```rust
//! use decoy_core::prelude::*;
//!
//! let triples = vec![
//!     Triple::new(0, 0, 1),
//!     Triple::new(1, 0, 2),
//!     Triple::new(0, 1, 2),
//! ];
//!
//! let index = TrueTripleIndex::build(&triples);
//! let ratios = RelationRatios::from_index(&index);
//!
//! assert_eq!(index.true_tails(HeadRelation::new(0, 0)), &[1]);
//! assert_eq!(ratios.tph(0), Some(1.0));
//! ```

pub mod types;
pub mod error;
pub mod frequency;
pub mod index;
pub mod ratios;
pub mod prelude;
