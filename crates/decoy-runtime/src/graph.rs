//! Knowledge graph bundle - triples plus their one-time statistics.
//!
//! Built once and shared behind an `Arc` by every dataset that samples
//! from it. Nothing in here changes after construction.

use decoy_core::error::{DecoyError, Result};
use decoy_core::frequency::{FrequencyTable, DEFAULT_FREQUENCY_START};
use decoy_core::index::TrueTripleIndex;
use decoy_core::ratios::{RelationCardinality, RelationRatios};
use decoy_core::types::{RelationId, Triple};
use serde::Serialize;
use tracing::info;

/// Training triples with their frequency table, true-triple index and ratios.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    triples: Vec<Triple>,
    nentity: usize,
    nrelation: usize,
    frequency: FrequencyTable,
    index: TrueTripleIndex,
    ratios: RelationRatios,
}

/// Summary counts for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub triples: usize,
    pub nentity: usize,
    pub nrelation: usize,
    pub frequency_entries: usize,
    /// Distinct (head, relation) keys in the frequency table.
    pub head_side_keys: usize,
    /// Distinct (tail, inverse relation) keys in the frequency table.
    pub tail_side_keys: usize,
    pub relations_with_stats: usize,
}

impl KnowledgeGraph {
    pub fn build(triples: Vec<Triple>, nentity: usize, nrelation: usize) -> Result<Self> {
        Self::with_frequency_start(triples, nentity, nrelation, DEFAULT_FREQUENCY_START)
    }

    pub fn with_frequency_start(
        triples: Vec<Triple>,
        nentity: usize,
        nrelation: usize,
        frequency_start: u32,
    ) -> Result<Self> {
        validate_triples(&triples, nentity, nrelation)?;

        let frequency = FrequencyTable::with_start(&triples, frequency_start);
        // ratios are derived from index sizes
        let index = TrueTripleIndex::build(&triples);
        let ratios = RelationRatios::from_index(&index);

        info!(
            triples = triples.len(),
            nentity,
            nrelation,
            frequency_entries = frequency.len(),
            "built knowledge graph statistics"
        );

        Ok(Self {
            triples,
            nentity,
            nrelation,
            frequency,
            index,
            ratios,
        })
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn triple(&self, index: usize) -> Result<Triple> {
        self.triples
            .get(index)
            .copied()
            .ok_or(DecoyError::IndexOutOfRange {
                index,
                len: self.triples.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn nentity(&self) -> usize {
        self.nentity
    }

    pub fn nrelation(&self) -> usize {
        self.nrelation
    }

    pub fn frequency(&self) -> &FrequencyTable {
        &self.frequency
    }

    pub fn index(&self) -> &TrueTripleIndex {
        &self.index
    }

    pub fn ratios(&self) -> &RelationRatios {
        &self.ratios
    }

    pub fn cardinality(&self, relation: RelationId) -> Result<RelationCardinality> {
        self.ratios
            .get(relation)
            .ok_or(DecoyError::UnknownRelation(relation))
    }

    /// Relations ordered by descending skew (most lopsided first).
    pub fn most_skewed(&self, limit: usize) -> Vec<RelationCardinality> {
        let mut cards: Vec<RelationCardinality> = self
            .ratios
            .relations()
            .into_iter()
            .filter_map(|r| self.ratios.get(r))
            .collect();
        cards.sort_by(|a, b| {
            b.skew()
                .partial_cmp(&a.skew())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        cards.truncate(limit);
        cards
    }

    pub fn stats(&self) -> GraphStats {
        let (head_side_keys, tail_side_keys) = self.frequency.side_counts();
        GraphStats {
            triples: self.triples.len(),
            nentity: self.nentity,
            nrelation: self.nrelation,
            frequency_entries: self.frequency.len(),
            head_side_keys,
            tail_side_keys,
            relations_with_stats: self.ratios.len(),
        }
    }
}

/// Check every id against `[0, nentity)` / `[0, nrelation)`.
pub fn validate_triples(triples: &[Triple], nentity: usize, nrelation: usize) -> Result<()> {
    for triple in triples {
        for entity in [triple.head, triple.tail] {
            if entity as usize >= nentity {
                return Err(DecoyError::EntityOutOfRange { entity, nentity });
            }
        }
        if triple.relation as usize >= nrelation {
            return Err(DecoyError::RelationOutOfRange {
                relation: triple.relation,
                nrelation,
            });
        }
    }
    Ok(())
}
