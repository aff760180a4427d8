//! Snapshot Types
//!
//! Serialization structs for per-tick line snapshots.
//!
//! A snapshot captures every train of both fleets at the end of a tick,
//! after scoring. Written as one JSON object per line for offline analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Direction, SimTimestamp};

/// Train operating status as written to snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusSnapshot {
    NotStarted,
    Running,
    Stopped { remaining_ticks: u32 },
    Finished,
}

impl StatusSnapshot {
    /// Human-readable label used in console reports.
    pub fn label(&self) -> &'static str {
        match self {
            StatusSnapshot::NotStarted => "Not started",
            StatusSnapshot::Running => "Running",
            StatusSnapshot::Stopped { .. } => "Stopped",
            StatusSnapshot::Finished => "Finished",
        }
    }
}

/// One train at the end of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSnapshot {
    pub index: usize,
    pub position: usize,
    pub station: String,
    pub load: u32,
    pub status: StatusSnapshot,
    pub satisfaction: f64,
}

impl fmt::Display for TrainSnapshot {
    /// Report line, e.g. `#3 小山 load 1234 Stopped (12 ticks) satisfaction 38.24`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.status.label();
        write!(f, "#{} {} load {} {}", self.index, self.station, self.load, label)?;
        if let StatusSnapshot::Stopped { remaining_ticks } = self.status {
            write!(f, " ({} ticks)", remaining_ticks)?;
        }
        write!(f, " satisfaction {:.2}", self.satisfaction)
    }
}

/// One fleet at the end of a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub direction: Direction,
    pub trains: Vec<TrainSnapshot>,
}

impl FleetSnapshot {
    /// Mean satisfaction of this fleet alone.
    pub fn mean_satisfaction(&self) -> f64 {
        if self.trains.is_empty() {
            return 0.0;
        }
        self.trains.iter().map(|t| t.satisfaction).sum::<f64>() / self.trains.len() as f64
    }

    /// Count of trains currently in the given state.
    pub fn count_where(&self, predicate: impl Fn(&StatusSnapshot) -> bool) -> usize {
        self.trains.iter().filter(|t| predicate(&t.status)).count()
    }
}

impl fmt::Display for FleetSnapshot {
    /// Status counts and mean satisfaction of the fleet on one line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let running = self.count_where(|s| matches!(s, StatusSnapshot::Running));
        let stopped = self.count_where(|s| matches!(s, StatusSnapshot::Stopped { .. }));
        let finished = self.count_where(|s| matches!(s, StatusSnapshot::Finished));
        write!(
            f,
            "{}: {} running, {} stopped, {} finished, mean satisfaction {:.2}",
            self.direction,
            running,
            stopped,
            finished,
            self.mean_satisfaction()
        )
    }
}

/// Both fleets at the end of one tick of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub run_index: u32,
    pub timestamp: SimTimestamp,
    /// Mean satisfaction across all trains of both fleets.
    pub average_satisfaction: f64,
    pub fleets: Vec<FleetSnapshot>,
}

impl TickSnapshot {
    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
