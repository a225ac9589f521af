//! Show corpus statistics.

use anyhow::Result;
use colored::Colorize;

use super::{build_graph, load_corpus};
use crate::config::Config;

pub fn run(data_dir: &str, top: usize) -> Result<()> {
    let config = Config::load()?;
    let corpus = load_corpus(data_dir)?;
    let graph = build_graph(&corpus, &config.sampling)?;
    let stats = graph.stats();

    println!();
    println!("{}", "Decoy Corpus Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Training Graph".blue().bold());
    println!("  Triples:           {}", stats.triples.to_string().cyan());
    println!("  Entities:          {}", stats.nentity.to_string().cyan());
    println!("  Relations:         {}", stats.nrelation.to_string().cyan());
    println!(
        "  Frequency entries: {} ({} head-side / {} tail-side)",
        stats.frequency_entries.to_string().cyan(),
        stats.head_side_keys,
        stats.tail_side_keys
    );
    println!("  Relations seen:    {}", stats.relations_with_stats.to_string().cyan());
    println!();

    let index = graph.index();
    let heads = index.head_entries().count();
    let tails = index.tail_entries().count();
    println!("{}", "True-Triple Index".blue().bold());
    println!("  (relation, tail) keys: {}", heads.to_string().cyan());
    println!("  (head, relation) keys: {}", tails.to_string().cyan());
    println!();

    let skewed = graph.most_skewed(top);
    if !skewed.is_empty() {
        let title = format!("Most Skewed Relations (top {})", skewed.len());
        println!("{}", title.as_str().blue().bold());
        println!("  {:<32} {:>10} {:>10}", "relation".dimmed(), "tph".dimmed(), "hpt".dimmed());
        for card in &skewed {
            let name = corpus.relation_name(card.relation).unwrap_or("?");
            let row = format!("  {:<32} {:>10.3} {:>10.3}", name, card.tph, card.hpt);
            if card.skew() >= 2.0 {
                println!("{}", row.as_str().yellow());
            } else {
                println!("{}", row);
            }
        }
        println!();
    }

    println!("{}", "═".repeat(40).dimmed());

    Ok(())
}
