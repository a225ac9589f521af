//! Side-Bias Demo: Relation Skew → Corruption Frequency
//!
//! Shows how cardinality-biased side selection spreads head and tail
//! corruption across relations of different shapes.
//!
//! Protocol:
//! 1. Generate a synthetic graph with 1-1, 1-N, N-1 and N-N relations
//! 2. Report tph/hpt per relation
//! 3. Replay 1000 steps per relation under several thresholds
//! 4. Draw batches from the alternating stream and count head rows
//! 5. Write the report as JSON

use decoy_core::types::{CorruptionMode, Triple};
use decoy_runtime::config::{SamplerConfig, SideStrategyKind};
use decoy_runtime::graph::KnowledgeGraph;
use decoy_runtime::side::SideStrategy;
use decoy_runtime::step::StepCounter;
use decoy_runtime::train::{training_stream, TrainDataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;

const NENTITY: u32 = 500;
const STEPS: u64 = 1000;
const THRESHOLDS: [u64; 3] = [2, 4, 8];

#[derive(Serialize)]
struct RelationReport {
    relation: u32,
    shape: &'static str,
    tph: f64,
    hpt: f64,
    head_share: Vec<(u64, f64)>,
}

#[derive(Serialize)]
struct StreamReport {
    strategy: String,
    batches: u64,
    examples: usize,
    head_rows: usize,
}

#[derive(Serialize)]
struct Report {
    triples: usize,
    relations: Vec<RelationReport>,
    streams: Vec<StreamReport>,
}

/// Four relations with known shapes, in relation id order.
fn synthetic_graph(rng: &mut StdRng) -> Vec<Triple> {
    let mut triples = Vec::new();

    // 0: one-to-one
    for h in 0..100 {
        triples.push(Triple::new(h, 0, (h + 1) % NENTITY));
    }
    // 1: one-to-many, each head has ~8 tails
    for h in 0..30 {
        for _ in 0..8 {
            triples.push(Triple::new(h, 1, rng.gen_range(100..NENTITY)));
        }
    }
    // 2: many-to-one, ~12 heads per tail
    for t in 0..20 {
        for _ in 0..12 {
            triples.push(Triple::new(rng.gen_range(100..NENTITY), 2, t));
        }
    }
    // 3: many-to-many
    for _ in 0..400 {
        triples.push(Triple::new(
            rng.gen_range(0..NENTITY),
            3,
            rng.gen_range(0..NENTITY),
        ));
    }

    triples.sort_by_key(|t| (t.relation, t.head, t.tail));
    triples.dedup();
    triples
}

fn main() {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  Side Bias: Relation Skew → Corruption Frequency     ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let mut rng = StdRng::seed_from_u64(7);
    let triples = synthetic_graph(&mut rng);
    let graph = match KnowledgeGraph::build(triples, NENTITY as usize, 4) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            eprintln!("Failed to build graph: {}", e);
            std::process::exit(1);
        }
    };
    println!("Graph: {} triples, {} entities, 4 relations", graph.len(), NENTITY);
    println!();

    // --- Phase 1: Cardinality ---
    println!("── Phase 1: Relation Cardinality ───────────────────────");
    let shapes = ["1-1", "1-N", "N-1", "N-N"];
    let mut relations = Vec::new();
    for (relation, shape) in shapes.iter().enumerate() {
        let Ok(card) = graph.cardinality(relation as u32) else {
            continue;
        };
        println!(
            "  r{} {:<4} tph={:>6.2}  hpt={:>6.2}  skew={:>5.2}",
            relation, shape, card.tph, card.hpt, card.skew()
        );
        relations.push(RelationReport {
            relation: relation as u32,
            shape,
            tph: card.tph,
            hpt: card.hpt,
            head_share: Vec::new(),
        });
    }
    println!();

    // --- Phase 2: Replay side selection ---
    println!("── Phase 2: Head Share over {} Steps ──────────────────", STEPS);
    print!("  {:<8}", "");
    for threshold in THRESHOLDS {
        print!(" thr={:<6}", threshold);
    }
    println!();

    for report in &mut relations {
        // any triple of the relation will do; selection only reads cardinality
        let Some(index) = graph.triples().iter().position(|t| t.relation == report.relation) else {
            continue;
        };
        print!("  r{} {:<4}", report.relation, report.shape);
        for threshold in THRESHOLDS {
            let dataset = TrainDataset::new(Arc::clone(&graph), 1)
                .with_strategy(SideStrategy::Biased { threshold });
            let heads = (0..STEPS)
                .filter(|&step| {
                    matches!(dataset.side_for(index, step), Ok(CorruptionMode::HeadBatch))
                })
                .count();
            let share = heads as f64 / STEPS as f64;
            print!(" {:>9.1}%", share * 100.0);
            report.head_share.push((threshold, share));
        }
        println!();
    }
    println!();

    // --- Phase 3: Alternating stream ---
    println!("── Phase 3: Alternating Stream (20 batches) ────────────");
    let mut streams = Vec::new();
    for kind in [SideStrategyKind::Biased, SideStrategyKind::Uniform] {
        let config = SamplerConfig::default()
            .with_batch_size(64)
            .with_negative_sample_size(16)
            .with_side_strategy(kind);
        let steps = StepCounter::new();
        let mut stream = match training_stream(Arc::clone(&graph), &config, steps.clone()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to build stream: {}", e);
                std::process::exit(1);
            }
        };

        let mut examples = 0;
        let mut head_rows = 0;
        for _ in 0..20 {
            match stream.next_batch() {
                Ok(batch) => {
                    examples += batch.len();
                    head_rows += batch.head_rows();
                }
                Err(e) => {
                    eprintln!("  step {}: {}", steps.get(), e);
                    break;
                }
            }
            steps.advance();
        }

        let strategy = format!("{:?}", kind).to_lowercase();
        println!(
            "  {:<8} {} examples, {} head rows ({:.1}%)",
            strategy,
            examples,
            head_rows,
            head_rows as f64 / examples.max(1) as f64 * 100.0
        );
        streams.push(StreamReport {
            strategy,
            batches: 20,
            examples,
            head_rows,
        });
    }
    println!();

    // --- Phase 4: Report ---
    let report = Report {
        triples: graph.len(),
        relations,
        streams,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            let path = "side_bias_report.json";
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Failed to write {}: {}", path, e);
            } else {
                println!("Report written to {}", path);
            }
        }
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}
