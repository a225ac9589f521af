//! Decoy CLI - inspect corpora and draw sample batches.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "decoy")]
#[command(author, version, about = "Decoy - filtered negative sampling for KG embeddings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default decoy.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show corpus and relation cardinality statistics
    Stats {
        /// Benchmark directory (entities.dict, relations.dict, train.txt, ...)
        data_dir: String,

        /// Number of most skewed relations to list
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Draw training batches from the alternating stream
    Sample {
        /// Benchmark directory
        data_dir: String,

        /// Number of batches to draw
        #[arg(short, long, default_value = "10")]
        steps: u64,

        /// Write batches as JSON lines instead of printing a summary
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build filtered evaluation batches and report filtering
    Evaluate {
        /// Benchmark directory
        data_dir: String,

        /// Split to evaluate
        #[arg(long, value_enum, default_value = "test")]
        split: Split,

        /// Only use the first N triples of the split
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Split {
    Test,
    Valid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Stats { data_dir, top } => commands::stats::run(&data_dir, top),
        Commands::Sample { data_dir, steps, output } => {
            commands::sample::run(&data_dir, steps, output.as_deref(), cli.verbose)
        }
        Commands::Evaluate { data_dir, split, limit } => {
            commands::evaluate::run(&data_dir, split, limit)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
