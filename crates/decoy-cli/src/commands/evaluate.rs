//! Build filtered evaluation batches and report what gets filtered.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use decoy::prelude::*;
use std::sync::Arc;

use super::load_corpus;
use crate::config::Config;
use crate::Split;

pub fn run(data_dir: &str, split: Split, limit: Option<usize>) -> Result<()> {
    let config = Config::load()?;
    let corpus = load_corpus(data_dir)?;

    let (name, triples) = match split {
        Split::Test => ("test", &corpus.test),
        Split::Valid => ("valid", &corpus.valid),
    };
    let take = limit.unwrap_or(triples.len()).min(triples.len());
    if take == 0 {
        bail!("The {} split is empty", name.cyan());
    }
    let triples = &triples[..take];

    let all_true = Arc::new(corpus.all_true());
    let (heads, tails) = evaluation_loaders(
        triples,
        all_true,
        corpus.nentity(),
        config.evaluation.batch_size,
    );

    println!(
        "{} Evaluating {} {} triples against {} candidates each...",
        "→".blue(),
        take.to_string().cyan(),
        name,
        corpus.nentity().to_string().cyan()
    );
    println!();

    for (label, loader) in [("head-batch", heads), ("tail-batch", tails)] {
        let mut rows = 0usize;
        let mut filtered = 0usize;
        let mut batches = 0usize;

        for batch in loader {
            let batch = batch.with_context(|| format!("Failed to build {} batch", label))?;
            rows += batch.len();
            filtered += batch.filter_bias.iter().filter(|&&b| b != 0.0).count();
            batches += 1;
        }

        let candidates = rows * corpus.nentity();
        let share = if candidates > 0 {
            filtered as f64 / candidates as f64 * 100.0
        } else {
            0.0
        };

        println!("{}", label.blue().bold());
        println!("  Batches:           {}", batches.to_string().cyan());
        println!("  Candidates:        {}", candidates.to_string().cyan());
        println!(
            "  Filtered:          {} ({:.3}%)",
            filtered.to_string().yellow(),
            share
        );
        println!();
    }

    println!("{} Evaluation batches built", "✓".green().bold());

    Ok(())
}
