//! Run-wide abort signal.
//!
//! Set once, by whichever side sees the first fatal error. Workers check it before
//! taking each prefix, and setting it kills every detail invocation still running, so
//! a worker blocked on a silent or hung tool is released too.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::process::ProcessKiller;

#[derive(Default)]
pub struct AbortSignal {
    aborted: AtomicBool,
    in_flight: Mutex<HashMap<usize, ProcessKiller>>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Mark the run aborted and kill every registered invocation.
    ///
    /// Only the first call has any effect.
    pub fn abort(&self) {
        if self.aborted.swap(true, Ordering::SeqCst) {
            return;
        }
        let in_flight = self.in_flight();
        log::debug!("Aborting run, killing {} running invocations", in_flight.len());
        for killer in in_flight.values() {
            killer.kill();
        }
    }

    /// Record the invocation `worker` is reading from.
    ///
    /// Returns `false` if the run is already aborted; the caller must then drop the
    /// invocation itself. Otherwise a later [`AbortSignal::abort`] is guaranteed to
    /// see and kill it.
    pub fn register(&self, worker: usize, killer: ProcessKiller) -> bool {
        self.in_flight().insert(worker, killer);
        !self.is_aborted()
    }

    pub fn unregister(&self, worker: usize) {
        self.in_flight().remove(&worker);
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<usize, ProcessKiller>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
