//! Batch assembly - per-example structs to struct-of-arrays batches.
//!
//! Scalar fields become length-N vectors and per-example arrays are
//! stacked into N×K matrices. The batch mode is taken from the first
//! example; with a fixed side strategy every example shares it, with the
//! biased strategy the `sign` vector is the per-row source of truth.

use crate::eval::EvaluationExample;
use crate::train::TrainingExample;
use decoy_core::error::{DecoyError, Result};
use decoy_core::types::{CorruptionMode, EntityId, RelationId};
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Merge a sequence of examples into one batch.
pub trait Collate: Sized {
    type Batch;

    fn collate(examples: Vec<Self>) -> Result<Self::Batch>;
}

/// Collated training examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainBatch {
    pub positive_entity: Array1<EntityId>,
    pub replaced_entity: Array1<EntityId>,
    pub relation: Array1<RelationId>,
    /// N × negative_sample_size.
    pub negative_sample: Array2<EntityId>,
    pub subsampling_weight: Array1<f32>,
    pub sign: Array1<f32>,
    pub mode: CorruptionMode,
}

impl TrainBatch {
    pub fn len(&self) -> usize {
        self.relation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relation.is_empty()
    }

    /// Rows whose sign says head corruption.
    pub fn head_rows(&self) -> usize {
        self.sign.iter().filter(|&&s| s < 0.0).count()
    }
}

/// Collated evaluation examples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestBatch {
    pub positive_entity: Array1<EntityId>,
    pub replaced_entity: Array1<EntityId>,
    pub relation: Array1<RelationId>,
    /// N × nentity candidate ids.
    pub negative_sample: Array2<EntityId>,
    /// N × nentity, 0 or the filter bias.
    pub filter_bias: Array2<f32>,
    pub sign: Array1<f32>,
    pub mode: CorruptionMode,
}

impl TestBatch {
    pub fn len(&self) -> usize {
        self.relation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relation.is_empty()
    }
}

impl Collate for TrainingExample {
    type Batch = TrainBatch;

    fn collate(examples: Vec<Self>) -> Result<TrainBatch> {
        let mode = examples.first().ok_or(DecoyError::EmptyBatch)?.mode;

        let n = examples.len();
        let mut positive = Vec::with_capacity(n);
        let mut replaced = Vec::with_capacity(n);
        let mut relation = Vec::with_capacity(n);
        let mut weight = Vec::with_capacity(n);
        let mut sign = Vec::with_capacity(n);
        let mut negatives = Vec::with_capacity(n);

        for ex in examples {
            positive.push(ex.positive_entity);
            replaced.push(ex.replaced_entity);
            relation.push(ex.relation);
            weight.push(ex.subsampling_weight);
            sign.push(ex.sign);
            negatives.push(ex.negative_sample);
        }

        Ok(TrainBatch {
            positive_entity: Array1::from_vec(positive),
            replaced_entity: Array1::from_vec(replaced),
            relation: Array1::from_vec(relation),
            negative_sample: stack_rows(negatives, "negative_sample")?,
            subsampling_weight: Array1::from_vec(weight),
            sign: Array1::from_vec(sign),
            mode,
        })
    }
}

impl Collate for EvaluationExample {
    type Batch = TestBatch;

    fn collate(examples: Vec<Self>) -> Result<TestBatch> {
        let mode = examples.first().ok_or(DecoyError::EmptyBatch)?.mode;

        let n = examples.len();
        let mut positive = Vec::with_capacity(n);
        let mut replaced = Vec::with_capacity(n);
        let mut relation = Vec::with_capacity(n);
        let mut sign = Vec::with_capacity(n);
        let mut candidates = Vec::with_capacity(n);
        let mut bias = Vec::with_capacity(n);

        for ex in examples {
            positive.push(ex.positive_entity);
            replaced.push(ex.replaced_entity);
            relation.push(ex.relation);
            sign.push(ex.sign);
            candidates.push(ex.negative_sample);
            bias.push(ex.filter_bias);
        }

        Ok(TestBatch {
            positive_entity: Array1::from_vec(positive),
            replaced_entity: Array1::from_vec(replaced),
            relation: Array1::from_vec(relation),
            negative_sample: stack_rows(candidates, "negative_sample")?,
            filter_bias: stack_rows(bias, "filter_bias")?,
            sign: Array1::from_vec(sign),
            mode,
        })
    }
}

/// Stack equal-length rows into a matrix.
fn stack_rows<T>(rows: Vec<Vec<T>>, field: &str) -> Result<Array2<T>> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some(row) = rows.iter().find(|r| r.len() != width) {
        return Err(DecoyError::Shape(format!(
            "{}: expected {} columns, found {}",
            field,
            width,
            row.len()
        )));
    }

    let n = rows.len();
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n, width), flat).map_err(|e| DecoyError::Shape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn train_example(pos: u32, rep: u32, negs: Vec<u32>, mode: CorruptionMode) -> TrainingExample {
        TrainingExample {
            positive_entity: pos,
            replaced_entity: rep,
            relation: 1,
            negative_sample: negs,
            subsampling_weight: 0.5,
            sign: mode.sign(),
            mode,
        }
    }

    #[test]
    fn training_batch_is_aligned() {
        let batch = TrainingExample::collate(vec![
            train_example(0, 1, vec![4, 5, 6], CorruptionMode::TailBatch),
            train_example(2, 3, vec![7, 8, 9], CorruptionMode::TailBatch),
        ])
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.positive_entity, array![0u32, 2]);
        assert_eq!(batch.replaced_entity, array![1u32, 3]);
        assert_eq!(batch.negative_sample, array![[4u32, 5, 6], [7, 8, 9]]);
        assert_eq!(batch.sign, array![1.0f32, 1.0]);
        assert_eq!(batch.mode, CorruptionMode::TailBatch);
        assert_eq!(batch.head_rows(), 0);
    }

    #[test]
    fn mode_comes_from_first_example() {
        let batch = TrainingExample::collate(vec![
            train_example(0, 1, vec![2], CorruptionMode::HeadBatch),
            train_example(0, 1, vec![2], CorruptionMode::TailBatch),
        ])
        .unwrap();
        assert_eq!(batch.mode, CorruptionMode::HeadBatch);
        assert_eq!(batch.sign, array![-1.0f32, 1.0]);
        assert_eq!(batch.head_rows(), 1);
    }

    #[test]
    fn empty_and_ragged_inputs_error() {
        assert_eq!(TrainingExample::collate(vec![]), Err(DecoyError::EmptyBatch));

        let err = TrainingExample::collate(vec![
            train_example(0, 1, vec![2, 3], CorruptionMode::TailBatch),
            train_example(0, 1, vec![2], CorruptionMode::TailBatch),
        ])
        .unwrap_err();
        assert!(matches!(err, DecoyError::Shape(msg) if msg.contains("expected 2 columns")));
    }

    #[test]
    fn test_batch_stacks_bias_matrix() {
        let ex = |rep: u32| EvaluationExample {
            positive_entity: 9,
            replaced_entity: rep,
            relation: 0,
            negative_sample: vec![0, 1, 2],
            filter_bias: vec![0.0, -100.0, 0.0],
            sign: -1.0,
            mode: CorruptionMode::HeadBatch,
        };
        let batch = EvaluationExample::collate(vec![ex(0), ex(2)]).unwrap();
        assert_eq!(batch.filter_bias.dim(), (2, 3));
        assert_eq!(batch.negative_sample.row(1).to_vec(), vec![0, 1, 2]);
        assert_eq!(batch.replaced_entity, array![0u32, 2]);
        assert_eq!(batch.mode, CorruptionMode::HeadBatch);
    }

    #[test]
    fn batch_serializes_to_json() {
        let batch = TrainingExample::collate(vec![train_example(0, 1, vec![2], CorruptionMode::TailBatch)]).unwrap();
        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.contains("\"mode\":\"tail-batch\""));
        assert!(json.contains("negative_sample"));
    }
}
