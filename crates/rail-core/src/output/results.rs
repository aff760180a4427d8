//! Run Result Sinks
//!
//! The append-only results file (one mean per line), the JSON Lines run log,
//! and an in-memory sink for harnesses.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rail_events::RunSummary;

use super::{ResultSink, SinkError};

/// Appends `mean_satisfaction` to a text file, two decimals per line.
///
/// The file is opened for append, written and closed on every run.
#[derive(Debug, Clone)]
pub struct ResultsFile {
    path: PathBuf,
}

impl ResultsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for ResultsFile {
    fn name(&self) -> &str {
        "results file"
    }

    fn record(&mut self, summary: &RunSummary) -> Result<(), SinkError> {
        append_line(&self.path, &summary.results_line())
    }
}

/// Appends each run's full summary as one JSON line.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for RunLog {
    fn name(&self) -> &str {
        "run log"
    }

    fn record(&mut self, summary: &RunSummary) -> Result<(), SinkError> {
        append_line(&self.path, &summary.to_jsonl()?)
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), SinkError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(SinkError::io(path))?;
    writeln!(file, "{}", line).map_err(SinkError::io(path))
}

/// Keeps results in memory. Clones of the handles stay readable after the
/// sink has been moved into [`super::ResultSinks`].
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    summaries: Arc<Mutex<Vec<RunSummary>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the results-file lines recorded so far.
    pub fn lines_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.lines)
    }

    /// Shared handle to the summaries recorded so far.
    pub fn summaries_handle(&self) -> Arc<Mutex<Vec<RunSummary>>> {
        Arc::clone(&self.summaries)
    }
}

impl ResultSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn record(&mut self, summary: &RunSummary) -> Result<(), SinkError> {
        // Poisoning leaves the Vec intact
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(summary.results_line());
        self.summaries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(summary.clone());
        Ok(())
    }
}
