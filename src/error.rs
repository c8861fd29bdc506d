//! Error taxonomy for the indexing pipeline.
//!
//! Every kind here is fatal to a run. Components return them as values and the
//! pipeline supervisor decides to abort; nothing in the library exits the process.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to start {binary} {args}: {source}")]
    ProcessSpawn {
        binary: PathBuf,
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read output of {command}: {source}")]
    ProcessRead {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    ProcessExit { command: String, status: std::process::ExitStatus },

    #[error("Malformed machine XML for {prefix}: {reason}")]
    Decode { prefix: String, reason: String },

    #[error("Invalid year {raw:?} for machine {machine}")]
    YearParse { machine: String, raw: String },

    #[error("Failed to commit batch of {size} records: {reason}")]
    BatchCommit { size: usize, reason: String },

    #[error("Failed to open index at {path}: {reason}")]
    StoreOpen { path: PathBuf, reason: String },

    #[error("Search failed: {0}")]
    Query(String),

    #[error("Index metadata error at {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl IndexError {
    pub(crate) fn decode(prefix: &str, reason: impl ToString) -> Self {
        IndexError::Decode { prefix: prefix.to_string(), reason: reason.to_string() }
    }
}
