//! Commuter line simulation: fleets, disruptions, passenger satisfaction.
//!
//! Two opposing fleets run along a fixed station table. Each tick trains
//! depart on schedule, roll for random disruptions, move one station and
//! board passengers; every train is then scored and the mean recorded.
//! A run's score is the mean of that per-tick series.
//!
//! # Modules
//!
//! - [`components`]: Stations, trains and fleets
//! - [`systems`]: The per-tick advance, scoring and disruption pipeline
//! - [`setup`]: Reference station table and fleet spawning
//! - [`driver`]: Schedule construction and the multi-run loop
//! - [`output`]: Result sinks and the per-tick snapshot log
//! - [`config`]: TOML tuning file

pub mod components;
pub mod config;
pub mod driver;
pub mod output;
pub mod setup;
pub mod systems;

// Re-export component types
pub use components::{Fleet, Station, StationTable, Train, TrainStatus};

// Re-export config types
pub use config::{ConfigError, DisruptionScope, SimConfig, StopTimer, DEFAULT_TUNING_PATH};

// Re-export driver types
pub use driver::{simulation_schedule, RunDriver, RunOutcome};

// Re-export output types
pub use output::{
    tick_report, MemorySink, ResultSink, ResultSinks, ResultsFile, RunLog, SinkError,
    SnapshotWriter,
};

// Re-export system types
pub use systems::{
    ConstantDisruption, Disruption, DisruptionSource, NoDisruptions, RandomDisruptions,
};
