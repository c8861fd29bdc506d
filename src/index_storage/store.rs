//! The index store seen by the batch indexer

use crate::error::Result;
use crate::models::Record;

/// Records committed together in one transactional write
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Persistent keyed record storage.
///
/// A commit either stores every record of the batch or none of them. Records are keyed
/// by name: committing a name that already exists replaces the stored record.
pub trait IndexStore {
    fn commit(&mut self, batch: Batch) -> Result<()>;
}

impl<S: IndexStore + ?Sized> IndexStore for &mut S {
    fn commit(&mut self, batch: Batch) -> Result<()> {
        (**self).commit(batch)
    }
}
