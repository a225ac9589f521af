//! Error types for decoy operations.
//!
//! Sampling, collation and loading all report through [`DecoyError`]
//! instead of panicking.

use thiserror::Error;

/// Result type for decoy operations.
pub type Result<T> = std::result::Result<T, DecoyError>;

/// Errors that can occur while building statistics, sampling or batching.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecoyError {
    /// A corruption mode string was neither head-batch nor tail-batch.
    #[error("Corruption mode {0:?} not supported (expected head-batch or tail-batch)")]
    InvalidMode(String),

    /// Rejection sampling hit its round budget before collecting enough negatives.
    #[error("Negative sampling exhausted after {rounds} rounds: collected {collected} of {requested}")]
    SamplingExhausted {
        rounds: usize,
        collected: usize,
        requested: usize,
    },

    /// No tph/hpt statistics exist for the relation.
    #[error("Relation {0} has no cardinality statistics")]
    UnknownRelation(u32),

    /// Dataset index past the end of the triple list.
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A triple references an entity outside `[0, nentity)`.
    #[error("Entity {entity} out of range (nentity = {nentity})")]
    EntityOutOfRange { entity: u32, nentity: usize },

    /// A triple references a relation outside `[0, nrelation)`.
    #[error("Relation {relation} out of range (nrelation = {nrelation})")]
    RelationOutOfRange { relation: u32, nrelation: usize },

    /// Collation was asked to build a batch from zero examples.
    #[error("Cannot collate an empty batch")]
    EmptyBatch,

    /// Per-example arrays did not line up when stacked.
    #[error("Batch shape mismatch: {0}")]
    Shape(String),

    /// A batch source produced nothing even after a restart.
    #[error("Batch source is empty after restart")]
    EmptySource,

    /// Configuration value rejected by validation.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed line in a dataset file.
    #[error("Parse error at {path}:{line}: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for DecoyError {
    fn from(e: std::io::Error) -> Self {
        DecoyError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for DecoyError {
    fn from(e: serde_json::Error) -> Self {
        DecoyError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl DecoyError {
    pub fn invalid_mode(mode: impl Into<String>) -> Self {
        DecoyError::InvalidMode(mode.into())
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        DecoyError::InvalidConfig {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(path: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        DecoyError::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = DecoyError::SamplingExhausted {
            rounds: 10,
            collected: 3,
            requested: 8,
        };
        assert_eq!(
            err.to_string(),
            "Negative sampling exhausted after 10 rounds: collected 3 of 8"
        );

        let err = DecoyError::parse("train.txt", 7, "expected 3 columns");
        assert_eq!(err.to_string(), "Parse error at train.txt:7: expected 3 columns");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DecoyError = io.into();
        assert!(matches!(err, DecoyError::Io(msg) if msg.contains("gone")));
    }
}
