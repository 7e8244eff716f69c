//! Recency CLI - replays a synthetic workload through an LRU cache

mod workload;

use anyhow::{Context, Result};
use clap::Parser;
use recency::{Capacity, LruCache, SharedCache};
use recency_dataset::{generate, DatasetConfig};
use tracing::info;

use crate::workload::Workload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items)
    #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
    capacity: i64,

    /// Passes over the category list
    #[arg(short, long, default_value_t = 300)]
    rounds: usize,

    /// Records per category per round
    #[arg(short, long, default_value_t = 5)]
    per_category: usize,

    /// Category tags, comma separated
    #[arg(long, value_delimiter = ',', default_value = "A,B")]
    categories: Vec<String>,

    /// Replay also re-reads the record this many positions back (0 disables)
    #[arg(short, long, default_value_t = 50)]
    window: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let capacity = Capacity::try_from(args.capacity).context("invalid --capacity")?;
    let config = DatasetConfig {
        rounds: args.rounds,
        categories: args.categories,
        per_category: args.per_category,
    };

    info!("Starting recency v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", capacity);
    info!("Dataset: {} records", config.len());

    let records = generate(&config);
    let cache = SharedCache::from_cache(LruCache::from_capacity(capacity));
    let report = Workload::new(cache, args.window).run(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
