//! Machine Indexer - full-text index of an emulator's machine catalog
//!
//! This library drives an external catalog tool and loads what it reports into a
//! tantivy index, in bounded memory. It supports:
//!
//! - Enumerating catalog names and chunking them into short prefixes
//! - Fetching each prefix's XML from the tool in parallel workers
//! - Streaming the XML, keeping only runnable, non-BIOS, non-device, non-mechanical machines
//! - Committing records in bounded batches through a single writer
//!
//! # Example
//!
//! ```no_run
//! use machine_indexer::{IndexerConfig, TantivyStore, run_indexing};
//! use machine_indexer::progress::NoProgress;
//!
//! let config = IndexerConfig::default();
//! let mut store = TantivyStore::open_or_create(&config.index_path)?;
//! let summary = run_indexing(&config, &mut store, &NoProgress)?;
//! println!("Indexed {} records", summary.records);
//! # Ok::<(), machine_indexer::IndexError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod index_storage;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod process;
pub mod progress;
pub mod utils;

// Re-export commonly used types
pub use config::IndexerConfig;
pub use error::IndexError;
pub use index_storage::{IndexStore, TantivyStore};
pub use indexer::{Pipeline, RunSummary, run_indexing};
pub use models::{Prefix, Record};
