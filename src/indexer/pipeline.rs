//! The ingestion pipeline: enumerate, fan out, fan in, commit.

use std::thread;
use std::time::Duration;

use super::abort::AbortSignal;
use super::batch::BatchIndexer;
use super::merge::merge_streams;
use super::prefixes::{PrefixEnumerator, PrefixQueue};
use super::workers::WorkerPool;
use crate::config::IndexerConfig;
use crate::error::Result;
use crate::index_storage::IndexStore;
use crate::process::CatalogTool;
use crate::progress::ProgressObserver;
use crate::utils::StageTimer;

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub prefixes: usize,
    pub records: u64,
    pub batches: usize,
    pub elapsed: Duration,
}

/// One indexing run over a validated configuration
pub struct Pipeline<'a> {
    config: &'a IndexerConfig,
    tool: CatalogTool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a IndexerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tool: CatalogTool::from_config(config) })
    }

    /// Run the listing invocation and return the prefix queue.
    /// Finishes before any worker starts.
    pub fn enumerate(&self) -> Result<PrefixQueue> {
        PrefixEnumerator::new(&self.tool, self.config.prefix_length).enumerate()
    }

    /// Fetch, decode and commit every prefix in `prefixes`.
    ///
    /// The first error anywhere (a worker's tool invocation, decoding, or a commit)
    /// ends the run and is returned. Batches committed before it stay in the store;
    /// everything after it is discarded. No worker takes another prefix and every
    /// tool process still running is killed.
    pub fn index<S: IndexStore>(
        &self,
        prefixes: PrefixQueue,
        store: S,
        observer: &dyn ProgressObserver,
    ) -> Result<RunSummary> {
        let timer = StageTimer::start("index records");
        let prefix_count = prefixes.len();

        let abort = AbortSignal::new();
        let pool = WorkerPool::new(&self.tool, self.config.parallelism, observer, &abort);
        let indexer = BatchIndexer::new(store, self.config.batch_threshold);

        let stats = thread::scope(|scope| {
            let streams = pool.start(scope, &prefixes);
            let merged = merge_streams(scope, streams);
            let result = indexer.index_stream(merged);
            if result.is_err() {
                abort.abort();
            }
            result
        })?;
        observer.on_finish();

        Ok(RunSummary {
            prefixes: prefix_count,
            records: stats.records,
            batches: stats.batches,
            elapsed: timer.elapsed(),
        })
    }
}

/// Enumerate and index in one call
pub fn run_indexing<S: IndexStore>(
    config: &IndexerConfig,
    store: S,
    observer: &dyn ProgressObserver,
) -> Result<RunSummary> {
    let pipeline = Pipeline::new(config)?;
    let prefixes = pipeline.enumerate()?;
    pipeline.index(prefixes, store, observer)
}
