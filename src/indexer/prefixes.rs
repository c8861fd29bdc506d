use crossbeam_channel::{Receiver, unbounded};

use crate::error::{IndexError, Result};
use crate::models::Prefix;
use crate::parsers::collect_prefixes;
use crate::process::CatalogTool;
use crate::utils::StageTimer;

/// Runs the listing invocation once and buckets every name into a prefix
pub struct PrefixEnumerator<'a> {
    tool: &'a CatalogTool,
    prefix_length: usize,
}

impl<'a> PrefixEnumerator<'a> {
    pub fn new(tool: &'a CatalogTool, prefix_length: usize) -> Self {
        Self { tool, prefix_length }
    }

    /// List all names and return their distinct prefixes as a work queue.
    ///
    /// # Errors
    ///
    /// Fails if the tool cannot be started, its output cannot be read, or it exits
    /// with a non-zero status. Nothing is returned in that case.
    pub fn enumerate(&self) -> Result<PrefixQueue> {
        let _timer = StageTimer::start("list prefixes");

        let mut process = self.tool.list_names()?;
        let stdout = process.take_stdout()?;
        let prefixes = collect_prefixes(stdout, self.prefix_length).map_err(|source| {
            IndexError::ProcessRead { command: process.command().to_string(), source }
        })?;
        process.finish()?;

        log::info!("Found {} distinct prefixes", prefixes.len());
        Ok(PrefixQueue::from_prefixes(prefixes))
    }
}

/// Finite, single-pass queue of prefixes shared by all workers.
///
/// Every prefix is delivered to exactly one consumer. The queue is filled once and
/// closed, so consumers see it end instead of blocking when it runs dry.
#[derive(Debug)]
pub struct PrefixQueue {
    receiver: Receiver<Prefix>,
    count: usize,
}

impl PrefixQueue {
    pub fn from_prefixes(prefixes: impl IntoIterator<Item = Prefix>) -> Self {
        let (sender, receiver) = unbounded();
        let mut count = 0;
        for prefix in prefixes {
            // The receiver is alive, so send cannot fail
            let _ = sender.send(prefix);
            count += 1;
        }
        Self { receiver, count }
    }

    /// Number of distinct prefixes enumerated, for progress sizing
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// A consumer handle on the shared queue
    pub(crate) fn consumer(&self) -> Receiver<Prefix> {
        self.receiver.clone()
    }
}

impl Iterator for PrefixQueue {
    type Item = Prefix;

    fn next(&mut self) -> Option<Prefix> {
        self.receiver.try_recv().ok()
    }
}
