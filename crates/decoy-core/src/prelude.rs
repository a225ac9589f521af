//! Decoy Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use decoy_core::prelude::*;
//! ```

pub use crate::types::{
    EntityId, RelationId,
    Triple, HeadRelation, RelationTail, PartialKey,
    CorruptionMode,
};

pub use crate::frequency::{FrequencyTable, DEFAULT_FREQUENCY_START};
pub use crate::index::{TripleSet, TrueTripleIndex};
pub use crate::ratios::{RelationCardinality, RelationRatios};

pub use crate::error::{DecoyError, Result};
