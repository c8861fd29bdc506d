use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::IndexerConfig;
use crate::index_storage::{IndexMetadata, TantivyStore, load_metadata, save_metadata};
use crate::indexer::Pipeline;
use crate::progress::{NoProgress, ProgressBarObserver};

#[derive(Parser)]
#[command(name = "machine-indexer")]
#[command(version = "0.1.0")]
#[command(about = "Build and search a full-text index of a machine catalog", long_about = None)]
pub struct Cli {
    /// JSON config file; command-line flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the catalog tool binary
    #[arg(long, global = true)]
    pub binary: Option<PathBuf>,

    /// Data root passed to the tool
    #[arg(long, global = true)]
    pub root_path: Option<PathBuf>,

    /// Directory to store the search index in
    #[arg(long, global = true)]
    pub index_path: Option<PathBuf>,

    /// Print debug information
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index every runnable machine in the catalog
    Index {
        /// Delete the existing index first
        #[arg(long)]
        reindex: bool,

        /// Characters of each name used to chunk the catalog
        #[arg(long)]
        prefix_length: Option<usize>,

        /// Records per committed batch (a batch commits past this size)
        #[arg(long)]
        batch_threshold: Option<usize>,

        /// Number of parallel workers
        #[arg(long)]
        workers: Option<usize>,

        /// Do not draw a progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// Full-text search of the index
    Search {
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Show statistics about the index
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = resolve_config(&cli)?;

    match &cli.command {
        Some(Commands::Index { reindex, prefix_length, batch_threshold, workers, no_progress }) => {
            if let Some(n) = prefix_length {
                config.prefix_length = *n;
            }
            if let Some(n) = batch_threshold {
                config.batch_threshold = *n;
            }
            if let Some(n) = workers {
                config.parallelism = *n;
            }
            index_catalog(&config, *reindex, !*no_progress)?;
        }
        Some(Commands::Search { query, limit }) => {
            search_index(&config, query, *limit)?;
        }
        Some(Commands::Stats) => {
            show_stats(&config)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Defaults, then the config file, then command-line flags
fn resolve_config(cli: &Cli) -> Result<IndexerConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexerConfig::from_file(path)?,
        None => IndexerConfig::default(),
    };
    if let Some(binary) = &cli.binary {
        config.binary_path = binary.clone();
    }
    if let Some(root_path) = &cli.root_path {
        config.root_path = root_path.clone();
    }
    if let Some(index_path) = &cli.index_path {
        config.index_path = index_path.clone();
    }
    Ok(config)
}

fn index_catalog(config: &IndexerConfig, reindex: bool, show_progress: bool) -> Result<()> {
    if reindex {
        delete_index(&config.index_path)?;
    }

    let pipeline = Pipeline::new(config)?;
    eprintln!("Detected {} cores, running {} workers", num_cpus::get(), config.parallelism);
    let prefixes = pipeline.enumerate().context("Failed to list catalog names")?;
    let mut store = TantivyStore::open_or_create(&config.index_path)?;

    let summary = if show_progress {
        let observer = ProgressBarObserver::new(prefixes.len());
        pipeline.index(prefixes, &mut store, &observer)
    } else {
        pipeline.index(prefixes, &mut store, &NoProgress)
    }
    .context("Indexing aborted")?;

    save_metadata(&config.index_path, &IndexMetadata::from_run(config, &summary))?;

    eprintln!(
        "Indexed {} records from {} prefixes ({} batches) in {:.1}s",
        summary.records,
        summary.prefixes,
        summary.batches,
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

/// Erase the index directory on disk
fn delete_index(index_path: &Path) -> Result<()> {
    if !index_path.exists() {
        return Ok(());
    }
    eprintln!("Removing index at {}", index_path.display());
    fs::remove_dir_all(index_path)
        .with_context(|| format!("Failed to remove index at {}", index_path.display()))
}

fn search_index(config: &IndexerConfig, query: &str, limit: usize) -> Result<()> {
    let store = TantivyStore::open(&config.index_path)?;
    let hits = store.search(query, limit)?;

    println!("{} results for \"{}\"", hits.len(), query);
    for hit in hits {
        println!();
        println!("{} ({:.3})", hit.name, hit.score);
        println!("  Description:   {}", hit.description);
        println!("  Year:          {}", hit.year);
        println!("  Manufacturer:  {}", hit.manufacturer);
        println!("  Driver status: {}", hit.driver_status);
    }

    Ok(())
}

fn show_stats(config: &IndexerConfig) -> Result<()> {
    let store = TantivyStore::open(&config.index_path)?;
    let records = store.num_records()?;

    println!("Machine Index Statistics");
    println!("========================");
    println!("Index: {}", store.path().display());
    println!("Records: {}", records);

    match load_metadata(&config.index_path)? {
        Some(metadata) => {
            println!();
            println!("Last run: {}", metadata.built_at.format("%Y-%m-%d %H:%M:%S"));
            println!("  Tool: {}", metadata.binary_path.display());
            println!("  Root path: {}", metadata.root_path.display());
            println!("  Prefixes: {}", metadata.prefixes);
            println!("  Records indexed: {}", metadata.records);
            println!("  Batches: {}", metadata.batches);
            println!("  Workers: {}", metadata.workers);
            println!("  Duration: {:.1}s", metadata.elapsed_secs);
        }
        None => {
            println!("No run metadata found");
        }
    }

    Ok(())
}
