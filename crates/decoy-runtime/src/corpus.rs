//! Benchmark directory loader.
//!
//! Reads the usual KGE benchmark layout:
//!
//! ```text
//! data/FB15k-237/
//!   entities.dict    id<TAB>name
//!   relations.dict   id<TAB>name
//!   train.txt        head<TAB>relation<TAB>tail   (names)
//!   valid.txt        optional
//!   test.txt         optional
//! ```

use decoy_core::error::{DecoyError, Result};
use decoy_core::index::TripleSet;
use decoy_core::types::{EntityId, RelationId, Triple};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A knowledge graph split into train/valid/test, with id dictionaries.
#[derive(Debug, Clone, Default)]
pub struct KgCorpus {
    pub entities: Vec<String>,
    pub relations: Vec<String>,
    pub train: Vec<Triple>,
    pub valid: Vec<Triple>,
    pub test: Vec<Triple>,
    entity_ids: HashMap<String, EntityId>,
    relation_ids: HashMap<String, RelationId>,
}

impl KgCorpus {
    /// Load a benchmark directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        let entities = read_dict(&path.join("entities.dict"))?;
        let relations = read_dict(&path.join("relations.dict"))?;

        let mut corpus = Self::from_dictionaries(entities, relations);
        corpus.train = corpus.read_triples(&path.join("train.txt"))?;

        for (name, split) in [("valid.txt", &mut corpus.valid), ("test.txt", &mut corpus.test)] {
            let file = path.join(name);
            if file.exists() {
                *split = read_named_triples(&file, &corpus.entity_ids, &corpus.relation_ids)?;
            }
        }

        info!(
            path = %path.display(),
            nentity = corpus.nentity(),
            nrelation = corpus.nrelation(),
            train = corpus.train.len(),
            valid = corpus.valid.len(),
            test = corpus.test.len(),
            "loaded corpus"
        );

        Ok(corpus)
    }

    /// Corpus with dictionaries only; splits start empty.
    pub fn from_dictionaries(entities: Vec<String>, relations: Vec<String>) -> Self {
        let entity_ids = index_names(&entities);
        let relation_ids = index_names(&relations);
        Self {
            entities,
            relations,
            entity_ids,
            relation_ids,
            ..Self::default()
        }
    }

    /// Parse a named triple file against this corpus's dictionaries.
    pub fn read_triples(&self, path: &Path) -> Result<Vec<Triple>> {
        read_named_triples(path, &self.entity_ids, &self.relation_ids)
    }

    pub fn nentity(&self) -> usize {
        self.entities.len()
    }

    pub fn nrelation(&self) -> usize {
        self.relations.len()
    }

    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.entity_ids.get(name).copied()
    }

    pub fn relation_id(&self, name: &str) -> Option<RelationId> {
        self.relation_ids.get(name).copied()
    }

    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id as usize).map(String::as_str)
    }

    pub fn relation_name(&self, id: RelationId) -> Option<&str> {
        self.relations.get(id as usize).map(String::as_str)
    }

    /// Train ∪ valid ∪ test, the filter set for evaluation.
    pub fn all_true(&self) -> TripleSet {
        self.train
            .iter()
            .chain(&self.valid)
            .chain(&self.test)
            .copied()
            .collect()
    }
}

fn index_names(names: &[String]) -> HashMap<String, u32> {
    names
        .iter()
        .enumerate()
        .map(|(id, name)| (name.clone(), id as u32))
        .collect()
}

/// Read an `id<TAB>name` file into an id-indexed name list.
///
/// Ids must cover `0..n` exactly once.
pub fn read_dict(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let display = path.display().to_string();

    let mut pairs: Vec<(usize, usize, String)> = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (id, name) = line
            .split_once('\t')
            .ok_or_else(|| DecoyError::parse(&display, lineno + 1, "expected id<TAB>name"))?;
        let id: usize = id
            .trim()
            .parse()
            .map_err(|_| DecoyError::parse(&display, lineno + 1, format!("invalid id {:?}", id)))?;
        pairs.push((lineno + 1, id, name.trim().to_string()));
    }

    let n = pairs.len();
    let mut names: Vec<Option<String>> = vec![None; n];
    for (lineno, id, name) in pairs {
        let slot = names.get_mut(id).ok_or_else(|| {
            DecoyError::parse(&display, lineno, format!("id {} outside 0..{}", id, n))
        })?;
        if slot.is_some() {
            return Err(DecoyError::parse(&display, lineno, format!("duplicate id {}", id)));
        }
        *slot = Some(name);
    }

    // every slot is filled: n distinct ids all below n
    Ok(names.into_iter().flatten().collect())
}

/// Read `head<TAB>relation<TAB>tail` name triples.
pub fn read_named_triples(
    path: &Path,
    entity_ids: &HashMap<String, EntityId>,
    relation_ids: &HashMap<String, RelationId>,
) -> Result<Vec<Triple>> {
    let content = std::fs::read_to_string(path)?;
    let display = path.display().to_string();

    let mut triples = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let &[h, r, t] = fields.as_slice() else {
            return Err(DecoyError::parse(
                &display,
                lineno + 1,
                format!("expected 3 columns, found {}", fields.len()),
            ));
        };

        let lookup = |map: &HashMap<String, u32>, name: &str, kind: &str| {
            map.get(name).copied().ok_or_else(|| {
                DecoyError::parse(&display, lineno + 1, format!("unknown {} {:?}", kind, name))
            })
        };

        triples.push(Triple::new(
            lookup(entity_ids, h, "entity")?,
            lookup(relation_ids, r, "relation")?,
            lookup(entity_ids, t, "entity")?,
        ));
    }

    Ok(triples)
}
