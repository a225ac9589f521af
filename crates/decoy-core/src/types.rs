//! Shared types used across all decoy crates.

use crate::error::DecoyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity identifier, in `[0, nentity)`.
pub type EntityId = u32;

/// Relation identifier, in `[0, nrelation)`.
pub type RelationId = u32;

/// A (head, relation, tail) fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub head: EntityId,
    pub relation: RelationId,
    pub tail: EntityId,
}

impl Triple {
    pub fn new(head: EntityId, relation: RelationId, tail: EntityId) -> Self {
        Self { head, relation, tail }
    }

    /// Key of the true-tail index for this triple.
    pub fn head_relation(&self) -> HeadRelation {
        HeadRelation::new(self.head, self.relation)
    }

    /// Key of the true-head index for this triple.
    pub fn relation_tail(&self) -> RelationTail {
        RelationTail::new(self.relation, self.tail)
    }

    /// Copy of this triple with the entity on `mode`'s side replaced.
    pub fn corrupt(&self, mode: CorruptionMode, entity: EntityId) -> Triple {
        match mode {
            CorruptionMode::HeadBatch => Triple::new(entity, self.relation, self.tail),
            CorruptionMode::TailBatch => Triple::new(self.head, self.relation, entity),
        }
    }
}

impl From<(EntityId, RelationId, EntityId)> for Triple {
    fn from((head, relation, tail): (EntityId, RelationId, EntityId)) -> Self {
        Self::new(head, relation, tail)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.head, self.relation, self.tail)
    }
}

/// (head, relation) key; indexes the valid tails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeadRelation {
    pub head: EntityId,
    pub relation: RelationId,
}

impl HeadRelation {
    pub fn new(head: EntityId, relation: RelationId) -> Self {
        Self { head, relation }
    }
}

/// (relation, tail) key; indexes the valid heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationTail {
    pub relation: RelationId,
    pub tail: EntityId,
}

impl RelationTail {
    pub fn new(relation: RelationId, tail: EntityId) -> Self {
        Self { relation, tail }
    }
}

/// Frequency-table key: an entity paired with a signed relation.
///
/// Head-side counts use the relation as-is; tail-side counts use the
/// inverse relation `-r - 1`, so both sides share one table without
/// colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartialKey {
    pub entity: EntityId,
    pub relation: i64,
}

impl PartialKey {
    pub fn head_side(head: EntityId, relation: RelationId) -> Self {
        Self {
            entity: head,
            relation: relation as i64,
        }
    }

    pub fn tail_side(tail: EntityId, relation: RelationId) -> Self {
        Self {
            entity: tail,
            relation: -(relation as i64) - 1,
        }
    }

    /// Whether this key counts a tail occurrence.
    pub fn is_inverse(&self) -> bool {
        self.relation < 0
    }
}

/// Which side of a triple is replaced when building negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorruptionMode {
    /// Corrupt the head entity.
    HeadBatch,
    /// Corrupt the tail entity.
    TailBatch,
}

impl CorruptionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorruptionMode::HeadBatch => "head-batch",
            CorruptionMode::TailBatch => "tail-batch",
        }
    }

    /// -1 for head corruption, +1 for tail corruption.
    pub fn sign(&self) -> f32 {
        match self {
            CorruptionMode::HeadBatch => -1.0,
            CorruptionMode::TailBatch => 1.0,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            CorruptionMode::HeadBatch => CorruptionMode::TailBatch,
            CorruptionMode::TailBatch => CorruptionMode::HeadBatch,
        }
    }

    /// Split a triple into (positive entity, replaced entity) for this mode.
    pub fn split(&self, triple: &Triple) -> (EntityId, EntityId) {
        match self {
            CorruptionMode::HeadBatch => (triple.tail, triple.head),
            CorruptionMode::TailBatch => (triple.head, triple.tail),
        }
    }
}

impl fmt::Display for CorruptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorruptionMode {
    type Err = DecoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head-batch" | "head" => Ok(CorruptionMode::HeadBatch),
            "tail-batch" | "tail" => Ok(CorruptionMode::TailBatch),
            other => Err(DecoyError::invalid_mode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_and_rejects() {
        assert_eq!("head-batch".parse::<CorruptionMode>(), Ok(CorruptionMode::HeadBatch));
        assert_eq!("tail".parse::<CorruptionMode>(), Ok(CorruptionMode::TailBatch));
        assert_eq!(
            "relation-batch".parse::<CorruptionMode>(),
            Err(DecoyError::InvalidMode("relation-batch".into()))
        );
    }

    #[test]
    fn split_puts_replaced_entity_second() {
        let t = Triple::new(3, 1, 7);
        assert_eq!(CorruptionMode::HeadBatch.split(&t), (7, 3));
        assert_eq!(CorruptionMode::TailBatch.split(&t), (3, 7));
        assert_eq!(CorruptionMode::HeadBatch.sign(), -1.0);
        assert_eq!(CorruptionMode::TailBatch.sign(), 1.0);
    }

    #[test]
    fn inverse_key_never_collides_with_forward_key() {
        for r in 0..50 {
            let fwd = PartialKey::head_side(5, r);
            let inv = PartialKey::tail_side(5, r);
            assert_ne!(fwd, inv);
            assert!(!fwd.is_inverse());
            assert!(inv.is_inverse());
        }
        assert_eq!(PartialKey::tail_side(0, 0).relation, -1);
    }

    #[test]
    fn corrupt_replaces_one_side() {
        let t = Triple::new(0, 2, 4);
        assert_eq!(t.corrupt(CorruptionMode::HeadBatch, 9), Triple::new(9, 2, 4));
        assert_eq!(t.corrupt(CorruptionMode::TailBatch, 9), Triple::new(0, 2, 9));
    }

    #[test]
    fn mode_serializes_kebab_case() {
        let json = serde_json::to_string(&CorruptionMode::HeadBatch).unwrap();
        assert_eq!(json, "\"head-batch\"");
    }
}
