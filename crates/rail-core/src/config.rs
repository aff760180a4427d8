//! Configuration System
//!
//! Loads run parameters from tuning.toml so experiments can be adjusted
//! without recompiling. Every section falls back to the reference values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::{Station, StationTable};
use crate::setup::reference_stations;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub fleets: FleetConfig,
    #[serde(default)]
    pub trains: TrainConfig,
    #[serde(default)]
    pub disruption: DisruptionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Replaces the built-in station table when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stations: Vec<Station>,
}

/// Run length and repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per run
    pub steps: u32,
    /// Independent runs per process
    pub runs: u32,
    /// Fixed seed for the disruption source; drawn from OS entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 720,
            runs: 100,
            seed: None,
        }
    }
}

/// Fleet sizes and timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub up_trains: usize,
    pub down_trains: usize,
    /// Ticks between consecutive departures of one fleet
    pub departure_interval: u32,
    /// Tick of each fleet's first departure
    pub first_departure: u32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            up_trains: 48,
            down_trains: 48,
            departure_interval: 15,
            first_departure: 0,
        }
    }
}

/// Rolling stock parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Passengers at 100% congestion
    pub capacity: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self { capacity: 2500 }
    }
}

/// Which trains a disruption halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionScope {
    /// Every train of the triggering train's fleet
    #[default]
    Fleet,
    /// Every train of both fleets
    Network,
}

/// How stop timers behave after a disruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopTimer {
    /// Remaining ticks never count down: a stopped train stays stopped for
    /// the rest of the run unless re-stopped.
    #[default]
    Persistent,
    /// Remaining ticks count down once per tick and the train resumes at zero.
    Decaying,
}

/// Disruption model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisruptionConfig {
    /// Chance per running train per tick
    pub probability: f64,
    /// Shortest stop in ticks
    pub min_stop_ticks: u32,
    /// Stop length is `min_stop_ticks + uniform[0, stop_spread_ticks)`
    pub stop_spread_ticks: u32,
    pub scope: DisruptionScope,
    pub stop_timer: StopTimer,
}

impl Default for DisruptionConfig {
    fn default() -> Self {
        Self {
            probability: 0.01,
            min_stop_ticks: 5,
            stop_spread_ticks: 100,
            scope: DisruptionScope::Fleet,
            stop_timer: StopTimer::Persistent,
        }
    }
}

/// Satisfaction formula weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score of an idle or unburdened train
    pub baseline: f64,
    /// Penalty at 100% congestion
    pub congestion_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline: 100.0,
            congestion_weight: 150.0,
        }
    }
}

/// Output destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only file receiving one mean per run
    pub results_path: PathBuf,
    /// JSON Lines file receiving one summary per run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_log_path: Option<PathBuf>,
    /// JSON Lines file receiving one snapshot per tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("simulation_results.txt"),
            run_log_path: None,
            snapshot_path: None,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&content)
    }

    /// Load configuration from `path`, or use defaults if the file does not
    /// exist. Unreadable or malformed files are still errors.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parses configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Configured stations, or the reference line when none are given.
    pub fn station_table(&self) -> StationTable {
        if self.stations.is_empty() {
            reference_stations()
        } else {
            StationTable::new(self.stations.clone())
        }
    }

    /// Trains across both directions. Station volumes are shared evenly
    /// across this many trains.
    pub fn total_trains(&self) -> usize {
        self.fleets.up_trains + self.fleets.down_trains
    }

    /// Rejects configurations the simulation cannot run meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let station_count = self.station_table().len();
        if station_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "need at least 2 stations, got {}",
                station_count
            )));
        }
        if self.total_trains() == 0 {
            return Err(ConfigError::Invalid("fleets contain no trains".into()));
        }
        if u32::try_from(self.total_trains()).is_err() {
            return Err(ConfigError::Invalid(format!(
                "too many trains: {}",
                self.total_trains()
            )));
        }
        if self.simulation.steps == 0 {
            return Err(ConfigError::Invalid("simulation.steps must be positive".into()));
        }
        if self.trains.capacity == 0 {
            return Err(ConfigError::Invalid("trains.capacity must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.disruption.probability) {
            return Err(ConfigError::Invalid(format!(
                "disruption.probability must be within [0, 1], got {}",
                self.disruption.probability
            )));
        }
        if self.disruption.stop_spread_ticks == 0 {
            return Err(ConfigError::Invalid(
                "disruption.stop_spread_ticks must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
