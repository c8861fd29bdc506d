//! Metadata describing the run that built an index

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::IndexerConfig;
use crate::indexer::RunSummary;

/// Metadata schema version for invalidation on format changes
pub const METADATA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub version: u32,
    pub built_at: DateTime<Utc>,
    pub binary_path: PathBuf,
    pub root_path: PathBuf,
    pub prefix_length: usize,
    pub batch_threshold: usize,
    pub workers: usize,
    pub prefixes: usize,
    pub records: u64,
    pub batches: usize,
    pub elapsed_secs: f64,
}

impl IndexMetadata {
    pub fn from_run(config: &IndexerConfig, summary: &RunSummary) -> Self {
        Self {
            version: METADATA_VERSION,
            built_at: Utc::now(),
            binary_path: config.binary_path.clone(),
            root_path: config.root_path.clone(),
            prefix_length: config.prefix_length,
            batch_threshold: config.batch_threshold,
            workers: config.parallelism,
            prefixes: summary.prefixes,
            records: summary.records,
            batches: summary.batches,
            elapsed_secs: summary.elapsed.as_secs_f64(),
        }
    }
}
