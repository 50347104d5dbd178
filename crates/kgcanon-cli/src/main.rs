//! kgcanon CLI
//!
//! Inspect canonicalization datasets from the command line:
//! - `summary`: table sizes and drop counts
//! - `item`: one indexed training example as JSON
//! - `gold`: gold clusters an entity belongs to
//! - `batches`: shapes of sequential batches

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use kgcanon_dataset::{
    CanonicalizationDataset, DatasetConfig, DatasetLoader, DatasetSummary, DuplicateClusterPolicy,
    GoldPolicy,
};

#[derive(Parser)]
#[command(name = "kgcanon")]
#[command(author, version)]
#[command(about = "Entity/relation canonicalization dataset tools")]
struct Cli {
    #[command(flatten)]
    load: LoadArgs,

    /// Log table loading (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LoadArgs {
    /// JSON loader config (file names, gold policies)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fail if the gold-cluster file is missing
    #[arg(long, global = true)]
    require_gold: bool,

    /// Fail on repeated cluster ids in the gold file
    #[arg(long, global = true)]
    reject_duplicate_clusters: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print table sizes
    Summary {
        dir: PathBuf,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the item at INDEX as JSON
    Item { dir: PathBuf, index: usize },
    /// Print the gold clusters ENTITY belongs to
    Gold { dir: PathBuf, entity: String },
    /// Print the shapes of sequential batches
    Batches {
        dir: PathBuf,
        #[arg(long)]
        size: usize,
        /// Stop after this many batches
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn loader(args: &LoadArgs) -> Result<DatasetLoader> {
    let mut config = match &args.config {
        Some(path) => DatasetConfig::from_json_file(path)?,
        None => DatasetConfig::default(),
    };
    if args.require_gold {
        config.gold_policy = GoldPolicy::Required;
    }
    if args.reject_duplicate_clusters {
        config.duplicate_clusters = DuplicateClusterPolicy::Reject;
    }
    Ok(DatasetLoader::new(config))
}

fn load(args: &LoadArgs, dir: &Path) -> Result<CanonicalizationDataset> {
    loader(args)?
        .load(dir)
        .with_context(|| format!("loading dataset from {}", dir.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summary { dir, json } => {
            let summary = load(&cli.load, &dir)?.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Item { dir, index } => {
            let ds = load(&cli.load, &dir)?;
            let item = ds.get(index)?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Commands::Gold { dir, entity } => {
            let ds = load(&cli.load, &dir)?;
            let gold = ds
                .gold_clusters()
                .ok_or_else(|| anyhow!("no gold clusters in {}", dir.display()))?;
            match gold.clusters_of(&entity) {
                Some(clusters) => {
                    for cluster in clusters {
                        println!("{cluster}");
                    }
                }
                None => println!("{} `{entity}` is not in any gold cluster", "note:".yellow()),
            }
        }
        Commands::Batches { dir, size, limit } => {
            let ds = load(&cli.load, &dir)?;
            let batches = ds.batches(size)?;
            let total = batches.len();
            for batch in batches.take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "batch start={} len={} triples={}x3 ent_side={} rel_side={}",
                    batch.start,
                    batch.len(),
                    batch.triples.len(),
                    batch.entity_side_info.len(),
                    batch.relation_side_info.len()
                );
            }
            println!("{} batches of up to {} items", total, size);
        }
    }
    Ok(())
}

fn print_summary(s: &DatasetSummary) {
    println!("{} {}", "Dataset".bold(), s.directory.display());
    println!("  {:<20} {}", "entities", s.entities);
    println!("  {:<20} {}", "relations", s.relations);
    println!("  {:<20} {} ({} raw)", "triples", s.triples, s.raw_triples);
    row_with_drops("typed triples", s.typed_triples, s.typed_triples_dropped);
    row_with_drops(
        "entity side-info",
        s.entity_side_info,
        s.entity_side_info_dropped,
    );
    row_with_drops(
        "relation side-info",
        s.relation_side_info,
        s.relation_side_info_dropped,
    );
    let gold = match (s.gold_clusters, s.gold_entities) {
        (Some(clusters), Some(entities)) => format!("{clusters} clusters, {entities} entities"),
        _ => "absent".yellow().to_string(),
    };
    println!("  {:<20} {}", "gold", gold);
}

fn row_with_drops(label: &str, kept: usize, dropped: usize) {
    if dropped > 0 {
        println!(
            "  {:<20} {} ({})",
            label,
            kept,
            format!("{dropped} dropped").yellow()
        );
    } else {
        println!("  {:<20} {}", label, kept);
    }
}
