//! Result Output
//!
//! Sinks that receive one summary per completed run, and the optional
//! per-tick snapshot log. Output failures are reported and skipped; they
//! never stop the simulation.

pub mod results;
pub mod snapshot;

use std::path::PathBuf;

use rail_events::RunSummary;
use thiserror::Error;

pub use results::{MemorySink, ResultsFile, RunLog};
pub use snapshot::{capture_snapshot, tick_report, SnapshotWriter};

/// Errors raised while writing output.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> SinkError {
        let path = path.into();
        move |source| SinkError::Io { path, source }
    }
}

/// Receives the summary of each completed run.
pub trait ResultSink {
    /// Short label used in log messages
    fn name(&self) -> &str;

    fn record(&mut self, summary: &RunSummary) -> Result<(), SinkError>;
}

/// Fans a summary out to every registered sink.
#[derive(Default)]
pub struct ResultSinks {
    sinks: Vec<Box<dyn ResultSink>>,
    failures: u32,
}

impl ResultSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ResultSink + 'static) -> Self {
        self.push(sink);
        self
    }

    pub fn push(&mut self, sink: impl ResultSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Writes failures seen so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Hands the summary to every sink. A failing sink skips this run's
    /// output; the others still receive it.
    pub fn record(&mut self, summary: &RunSummary) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.record(summary) {
                self.failures += 1;
                tracing::warn!(
                    "Skipping {} output for run {}: {}",
                    sink.name(),
                    summary.run_index,
                    e
                );
            }
        }
    }
}
