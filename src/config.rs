//! Indexer configuration.
//!
//! One [`IndexerConfig`] value is built at startup (defaults, then an optional JSON
//! file, then command-line overrides) and handed to every pipeline stage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

pub const DEFAULT_PREFIX_LENGTH: usize = 2;
pub const DEFAULT_BATCH_THRESHOLD: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// External catalog tool
    pub binary_path: PathBuf,
    /// Passed to the tool as `-rootpath`
    pub root_path: PathBuf,
    /// Directory holding the full-text index
    pub index_path: PathBuf,
    pub prefix_length: usize,
    pub batch_threshold: usize,
    /// Number of fetch/decode workers
    pub parallelism: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("mame/mame"),
            root_path: PathBuf::from("mame/roms"),
            index_path: PathBuf::from("index.tantivy"),
            prefix_length: DEFAULT_PREFIX_LENGTH,
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            parallelism: num_cpus::get(),
        }
    }
}

impl IndexerConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            IndexError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: IndexerConfig = serde_json::from_str(&raw).map_err(|e| {
            IndexError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix_length == 0 {
            return Err(IndexError::Config("prefix length must be at least 1".to_string()));
        }
        if self.batch_threshold == 0 {
            return Err(IndexError::Config("batch threshold must be at least 1".to_string()));
        }
        if self.parallelism == 0 {
            return Err(IndexError::Config("parallelism must be at least 1".to_string()));
        }
        Ok(())
    }
}
