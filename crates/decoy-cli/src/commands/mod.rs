//! CLI command implementations.

pub mod init;
pub mod stats;
pub mod sample;
pub mod evaluate;

use anyhow::{Context, Result};
use colored::Colorize;
use decoy::prelude::*;
use std::path::Path;

/// Load a benchmark directory, reporting what was found.
pub(crate) fn load_corpus(data_dir: &str) -> Result<KgCorpus> {
    println!("{} Loading {}...", "→".blue(), data_dir.cyan());
    let corpus = KgCorpus::from_directory(Path::new(data_dir))
        .with_context(|| format!("Failed to load corpus from {}", data_dir))?;
    println!(
        "  Loaded: {} entities, {} relations, {} train / {} valid / {} test triples",
        corpus.nentity().to_string().cyan(),
        corpus.nrelation().to_string().cyan(),
        corpus.train.len().to_string().cyan(),
        corpus.valid.len().to_string().cyan(),
        corpus.test.len().to_string().cyan()
    );
    Ok(corpus)
}

/// Knowledge graph over the training split.
pub(crate) fn build_graph(corpus: &KgCorpus, config: &SamplerConfig) -> Result<KnowledgeGraph> {
    KnowledgeGraph::with_frequency_start(
        corpus.train.clone(),
        corpus.nentity(),
        corpus.nrelation(),
        config.frequency_start,
    )
    .context("Failed to build knowledge graph")
}
