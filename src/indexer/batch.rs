use std::mem;

use crate::error::Result;
use crate::index_storage::{Batch, IndexStore};
use crate::models::Record;

/// Counts reported by [`BatchIndexer`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub records: u64,
    pub batches: usize,
}

/// Single writer that groups records into bounded batches.
///
/// A batch is committed as soon as it holds more than `threshold` records, i.e. on
/// the `threshold + 1`-th record, so full batches carry `threshold + 1` records. The
/// non-empty remainder is committed by [`BatchIndexer::finish`].
pub struct BatchIndexer<S: IndexStore> {
    store: S,
    threshold: usize,
    batch: Batch,
    stats: IndexStats,
}

impl<S: IndexStore> BatchIndexer<S> {
    pub fn new(store: S, threshold: usize) -> Self {
        Self {
            store,
            threshold,
            batch: Batch::with_capacity(threshold + 1),
            stats: IndexStats::default(),
        }
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Number of records waiting in the active batch
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn add(&mut self, record: Record) -> Result<()> {
        self.batch.push(record);
        self.stats.records += 1;
        if self.batch.len() > self.threshold {
            self.commit_active()?;
        }
        Ok(())
    }

    /// Commit the remainder and return the final counts
    pub fn finish(mut self) -> Result<IndexStats> {
        if !self.batch.is_empty() {
            self.commit_active()?;
        }
        Ok(self.stats)
    }

    /// Consume a record stream to its end.
    ///
    /// The first error in the stream is returned as is; records still in the active
    /// batch at that point are not committed.
    pub fn index_stream<I>(mut self, records: I) -> Result<IndexStats>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        for record in records {
            self.add(record?)?;
        }
        self.finish()
    }

    fn commit_active(&mut self) -> Result<()> {
        let batch = mem::replace(&mut self.batch, Batch::with_capacity(self.threshold + 1));
        let size = batch.len();
        self.store.commit(batch)?;
        self.stats.batches += 1;
        log::debug!("Batch {} committed ({} records)", self.stats.batches, size);
        Ok(())
    }
}
