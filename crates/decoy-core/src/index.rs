//! True-triple lookups used to keep negatives honest.
//!
//! [`TripleSet`] answers "is this exact triple known?" and backs
//! evaluation filtering. [`TrueTripleIndex`] maps each partial triple to
//! the deduplicated entities that complete it and backs negative sampling.

use crate::types::{CorruptionMode, EntityId, HeadRelation, RelationTail, Triple};
use std::collections::{HashMap, HashSet};

/// Immutable set of known-true triples.
#[derive(Debug, Clone, Default)]
pub struct TripleSet {
    triples: HashSet<Triple>,
}

impl TripleSet {
    pub fn new(triples: &[Triple]) -> Self {
        triples.iter().copied().collect()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

/// Valid heads per (relation, tail) and valid tails per (head, relation).
///
/// Value arrays are sorted and deduplicated.
#[derive(Debug, Clone, Default)]
pub struct TrueTripleIndex {
    true_head: HashMap<RelationTail, Vec<EntityId>>,
    true_tail: HashMap<HeadRelation, Vec<EntityId>>,
}

impl TrueTripleIndex {
    pub fn build(triples: &[Triple]) -> Self {
        let mut true_head: HashMap<RelationTail, Vec<EntityId>> = HashMap::new();
        let mut true_tail: HashMap<HeadRelation, Vec<EntityId>> = HashMap::new();

        for triple in triples {
            true_tail
                .entry(triple.head_relation())
                .or_default()
                .push(triple.tail);
            true_head
                .entry(triple.relation_tail())
                .or_default()
                .push(triple.head);
        }

        // Input may contain duplicate triples
        for heads in true_head.values_mut() {
            heads.sort_unstable();
            heads.dedup();
        }
        for tails in true_tail.values_mut() {
            tails.sort_unstable();
            tails.dedup();
        }

        Self { true_head, true_tail }
    }

    /// Heads `h` such that `(h, relation, tail)` is known. Empty if none.
    pub fn true_heads(&self, key: RelationTail) -> &[EntityId] {
        self.true_head.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tails `t` such that `(head, relation, t)` is known. Empty if none.
    pub fn true_tails(&self, key: HeadRelation) -> &[EntityId] {
        self.true_tail.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The entities that must not be drawn when corrupting `triple` on `mode`'s side.
    pub fn true_entities(&self, mode: CorruptionMode, triple: &Triple) -> &[EntityId] {
        match mode {
            CorruptionMode::HeadBatch => self.true_heads(triple.relation_tail()),
            CorruptionMode::TailBatch => self.true_tails(triple.head_relation()),
        }
    }

    pub fn head_entries(&self) -> impl Iterator<Item = (&RelationTail, &[EntityId])> {
        self.true_head.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn tail_entries(&self) -> impl Iterator<Item = (&HeadRelation, &[EntityId])> {
        self.true_tail.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Membership test on a sorted, deduplicated id array.
pub fn contains_sorted(sorted: &[EntityId], entity: EntityId) -> bool {
    sorted.binary_search(&entity).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Triple> {
        vec![Triple::new(0, 0, 1), Triple::new(1, 0, 2), Triple::new(0, 1, 2)]
    }

    #[test]
    fn index_matches_small_graph() {
        let index = TrueTripleIndex::build(&sample());
        assert_eq!(index.true_tails(HeadRelation::new(0, 0)), &[1]);
        assert_eq!(index.true_tails(HeadRelation::new(1, 0)), &[2]);
        assert_eq!(index.true_heads(RelationTail::new(1, 2)), &[0]);
        assert_eq!(index.true_heads(RelationTail::new(0, 1)), &[0]);
        assert!(index.true_heads(RelationTail::new(1, 1)).is_empty());
    }

    #[test]
    fn duplicates_are_removed() {
        let triples = vec![
            Triple::new(0, 0, 3),
            Triple::new(0, 0, 1),
            Triple::new(0, 0, 3),
            Triple::new(2, 0, 3),
        ];
        let index = TrueTripleIndex::build(&triples);
        assert_eq!(index.true_tails(HeadRelation::new(0, 0)), &[1, 3]);
        assert_eq!(index.true_heads(RelationTail::new(0, 3)), &[0, 2]);
    }

    #[test]
    fn true_entities_follows_mode() {
        let index = TrueTripleIndex::build(&sample());
        let t = Triple::new(1, 0, 2);
        assert_eq!(index.true_entities(CorruptionMode::HeadBatch, &t), &[1]);
        assert_eq!(index.true_entities(CorruptionMode::TailBatch, &t), &[2]);
    }

    #[test]
    fn triple_set_membership() {
        let set = TripleSet::new(&sample());
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Triple::new(0, 1, 2)));
        assert!(!set.contains(&Triple::new(2, 1, 0)));
    }

    #[test]
    fn sorted_membership() {
        let ids = [1, 4, 9];
        assert!(contains_sorted(&ids, 4));
        assert!(!contains_sorted(&ids, 5));
        assert!(!contains_sorted(&[], 0));
    }
}
