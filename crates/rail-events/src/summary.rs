//! Run Summary Types
//!
//! One record per completed run, produced from the per-tick satisfaction
//! series and handed to the result sinks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Tick;

/// Generates a fresh run id.
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Mean of a per-tick satisfaction series. Empty series yield `0.0`.
pub fn series_mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Zero-based position of the run within the batch.
    pub run_index: u32,
    pub ticks: Tick,
    /// Mean of the per-tick average satisfaction series.
    pub mean_satisfaction: f64,
    pub min_tick_satisfaction: f64,
    pub max_tick_satisfaction: f64,
    /// Disruptions fired during the run, across both directions.
    pub disruptions: u32,
    /// Trains in the `Finished` state when the run ended.
    pub finished_trains: u32,
    pub total_trains: u32,
}

impl RunSummary {
    /// Builds a summary from a run's per-tick series.
    pub fn from_series(
        run_index: u32,
        series: &[f64],
        disruptions: u32,
        finished_trains: u32,
        total_trains: u32,
    ) -> Self {
        let (min, max) = if series.is_empty() {
            (0.0, 0.0)
        } else {
            series
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };

        Self {
            run_id: generate_run_id(),
            run_index,
            ticks: series.len() as Tick,
            mean_satisfaction: series_mean(series),
            min_tick_satisfaction: min,
            max_tick_satisfaction: max,
            disruptions,
            finished_trains,
            total_trains,
        }
    }

    /// The results-file line: the mean to two decimal places.
    pub fn results_line(&self) -> String {
        format!("{:.2}", self.mean_satisfaction)
    }

    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
