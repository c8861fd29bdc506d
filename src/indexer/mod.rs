//! Concurrent ingestion of the tool's catalog into the index
//!
//! # Pipeline
//!
//! - **Enumeration**: [`PrefixEnumerator`] runs the listing invocation once and turns
//!   every name into a short prefix. Runs to completion before any worker starts.
//!
//! - **Fan-out**: [`WorkerPool`] runs N workers that take prefixes from the shared
//!   [`PrefixQueue`] and stream each prefix's decoded records from a detail
//!   invocation ([`DetailStream`]) into their own bounded output channel.
//!
//! - **Fan-in**: [`merge_streams`] joins the worker channels into one stream that
//!   closes only after every worker has closed.
//!
//! - **Commit**: [`BatchIndexer`] is the single writer, committing bounded batches.
//!
//! All channels are bounded, so a slow commit stalls the workers, which stop reading
//! their tool's stdout, which blocks the tool itself.
//!
//! # Error Handling Strategy
//!
//! Abort on first error. Workers forward a fatal error as the last item of their
//! stream and raise the shared [`AbortSignal`]; the batch indexer returns the error
//! (raising the signal itself for commit failures) and the run stops. No retry, no
//! per-prefix isolation. Batches committed before the failure remain in the index.

pub mod abort;
pub mod batch;
pub mod fetch;
pub mod merge;
pub mod pipeline;
pub mod prefixes;
pub mod workers;

pub use abort::AbortSignal;
pub use batch::{BatchIndexer, IndexStats};
pub use fetch::DetailStream;
pub use merge::merge_streams;
pub use pipeline::{Pipeline, RunSummary, run_indexing};
pub use prefixes::{PrefixEnumerator, PrefixQueue};
pub use workers::WorkerPool;
