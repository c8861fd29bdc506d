use std::thread::Scope;

use crossbeam_channel::{Receiver, Sender, bounded};

use super::abort::AbortSignal;
use super::fetch::DetailStream;
use super::prefixes::PrefixQueue;
use crate::error::Result;
use crate::models::{Prefix, Record};
use crate::process::CatalogTool;
use crate::progress::ProgressObserver;

/// Capacity of each worker's output stream
pub const WORKER_BUFFER: usize = 16;

/// Output stream of one worker: records, or the error that stopped it
pub type WorkerStream = Receiver<Result<Record>>;

/// Fixed pool of fetch/decode workers sharing one prefix queue
pub struct WorkerPool<'a> {
    tool: &'a CatalogTool,
    parallelism: usize,
    observer: &'a dyn ProgressObserver,
    abort: &'a AbortSignal,
}

impl<'a> WorkerPool<'a> {
    pub fn new(
        tool: &'a CatalogTool,
        parallelism: usize,
        observer: &'a dyn ProgressObserver,
        abort: &'a AbortSignal,
    ) -> Self {
        Self { tool, parallelism: parallelism.max(1), observer, abort }
    }

    /// Start the workers inside `scope` and return one output stream per worker.
    ///
    /// A worker closes its stream when the queue is exhausted. On a fatal error it
    /// sends the error as its last item and aborts the run. Once the run is aborted
    /// every worker stops before taking another prefix, and an invocation it is
    /// reading from is killed. A worker whose stream is dropped stops at its next send.
    pub fn start<'scope>(
        &self,
        scope: &'scope Scope<'scope, 'a>,
        prefixes: &PrefixQueue,
    ) -> Vec<WorkerStream> {
        log::info!("Starting {} workers for {} prefixes", self.parallelism, prefixes.len());

        (0..self.parallelism)
            .map(|id| {
                let (output, stream) = bounded(WORKER_BUFFER);
                let worker = Worker {
                    id,
                    tool: self.tool,
                    observer: self.observer,
                    abort: self.abort,
                };
                let queue = prefixes.consumer();
                scope.spawn(move || worker.run(queue, output));
                stream
            })
            .collect()
    }
}

struct Worker<'a> {
    id: usize,
    tool: &'a CatalogTool,
    observer: &'a dyn ProgressObserver,
    abort: &'a AbortSignal,
}

impl Worker<'_> {
    fn run(&self, queue: Receiver<Prefix>, output: Sender<Result<Record>>) {
        let mut handled = 0usize;
        loop {
            if self.abort.is_aborted() {
                log::debug!("Worker {} stopping: run aborted", self.id);
                return;
            }
            let Ok(prefix) = queue.recv() else {
                break;
            };

            match self.forward_prefix(&prefix, &output) {
                Ok(true) => {
                    handled += 1;
                    self.observer.on_prefix_complete(&prefix);
                }
                // Output dropped, or the run was aborted mid-prefix
                Ok(false) => {
                    log::debug!("Worker {} stopping at {}", self.id, prefix);
                    return;
                }
                // Failures of killed invocations are a consequence of the abort
                Err(_) if self.abort.is_aborted() => return,
                Err(e) => {
                    log::debug!("Worker {} failed on {}: {}", self.id, prefix, e);
                    let _ = output.send(Err(e));
                    self.abort.abort();
                    return;
                }
            }
        }
        log::debug!("Worker {} finished after {} prefixes", self.id, handled);
    }

    /// Stream one prefix's records into `output`.
    ///
    /// Returns `Ok(false)` if the receiving side has gone away or the run was aborted.
    fn forward_prefix(&self, prefix: &Prefix, output: &Sender<Result<Record>>) -> Result<bool> {
        let mut stream = DetailStream::open(self.tool, prefix)?;
        if !self.abort.register(self.id, stream.killer()) {
            self.abort.unregister(self.id);
            return Ok(false);
        }

        let forwarded = forward_records(&mut stream, output);
        self.abort.unregister(self.id);
        if !forwarded? || self.abort.is_aborted() {
            return Ok(false);
        }

        stream.finish()?;
        Ok(true)
    }
}

fn forward_records(stream: &mut DetailStream, output: &Sender<Result<Record>>) -> Result<bool> {
    for record in stream.by_ref() {
        if output.send(Ok(record?)).is_err() {
            return Ok(false);
        }
    }
    Ok(true)
}
