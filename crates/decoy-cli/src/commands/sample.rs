//! Draw batches from the alternating training stream.

use anyhow::{Context, Result};
use colored::Colorize;
use decoy::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use super::{build_graph, load_corpus};
use crate::config::Config;

pub fn run(data_dir: &str, steps: u64, output: Option<&str>, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let corpus = load_corpus(data_dir)?;
    let graph = Arc::new(build_graph(&corpus, &config.sampling)?);

    let counter = StepCounter::new();
    let mut stream = training_stream(graph, &config.sampling, counter.clone())
        .context("Failed to build training stream")?;

    let mut writer = match output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => None,
    };

    let strategy = format!("{:?}", config.sampling.side_strategy).to_lowercase();
    println!(
        "{} Drawing {} batches ({} negatives each, {} strategy)...",
        "→".blue(),
        steps.to_string().cyan(),
        config.sampling.negative_sample_size.to_string().cyan(),
        strategy.as_str().cyan()
    );

    let pb = ProgressBar::new(steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} batches")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let mut examples = 0usize;
    let mut head_rows = 0usize;

    for _ in 0..steps {
        let batch = stream
            .next_batch()
            .with_context(|| format!("Failed at step {}", counter.get()))?;

        examples += batch.len();
        head_rows += batch.head_rows();

        if let Some(w) = writer.as_mut() {
            serde_json::to_writer(&mut *w, &batch).context("Failed to serialize batch")?;
            w.write_all(b"\n")?;
        } else if verbose {
            pb.println(format!(
                "  step {:>5}  {:<10} {:>5} rows  {:>5} head",
                counter.get(),
                batch.mode.as_str(),
                batch.len(),
                batch.head_rows()
            ));
        }

        counter.advance();
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(mut w) = writer {
        w.flush().context("Failed to flush output")?;
    }

    println!();
    println!("{} Sampling complete!", "✓".green().bold());
    println!("  Batches:           {}", steps.to_string().cyan());
    println!("  Examples:          {}", examples.to_string().cyan());
    if examples > 0 {
        let head_share = head_rows as f64 / examples as f64 * 100.0;
        println!(
            "  Corrupted side:    {:.1}% head / {:.1}% tail",
            head_share,
            100.0 - head_share
        );
    }
    println!(
        "  Restarts:          {} / {}",
        stream.first().restarts().to_string().yellow(),
        stream.second().restarts().to_string().yellow()
    );
    if let Some(path) = output {
        println!("  Written to:        {}", path.green());
    }

    Ok(())
}
