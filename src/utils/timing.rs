use std::time::{Duration, Instant};

/// Logs how long a stage took when dropped (visible with `--debug`)
pub struct StageTimer {
    name: String,
    started: Instant,
}

impl StageTimer {
    pub fn start(name: impl Into<String>) -> Self {
        Self { name: name.into(), started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        log::debug!("{} took {:?}", self.name, self.started.elapsed());
    }
}
