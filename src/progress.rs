//! Progress reporting for the worker pool.
//!
//! Workers call [`ProgressObserver::on_prefix_complete`] once per finished prefix, from
//! any thread. How (or whether) that is shown is up to the observer.

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::Prefix;

pub trait ProgressObserver: Send + Sync {
    /// Called once for every prefix whose records have all been forwarded
    fn on_prefix_complete(&self, prefix: &Prefix);

    /// Called once after the last batch is committed
    fn on_finish(&self) {}
}

/// Ignores all notifications
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_prefix_complete(&self, _prefix: &Prefix) {}
}

/// Counts completed prefixes
#[derive(Debug, Default)]
pub struct PrefixCounter {
    completed: AtomicUsize,
}

impl PrefixCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl ProgressObserver for PrefixCounter {
    fn on_prefix_complete(&self, _prefix: &Prefix) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Terminal progress bar sized to the number of prefixes
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(prefix_count: usize) -> Self {
        let bar = ProgressBar::new(prefix_count as u64);
        let template = "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} prefixes {msg}";
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("##-"));
        }
        Self { bar }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_prefix_complete(&self, prefix: &Prefix) {
        self.bar.set_message(prefix.pattern());
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_with_message("Indexing complete!");
    }
}
