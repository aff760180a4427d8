//! Shared record types and serialization for the line simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the simulation engine and any offline tooling
//! that reads its output.

pub mod direction;
pub mod snapshot;
pub mod summary;
pub mod timestamp;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use direction::Direction;

// Re-export timestamp types
pub use timestamp::{
    ParseTimeError, ServiceTime, SimTimestamp, Tick, TICKS_PER_DAY, TICKS_PER_HOUR,
};

// Re-export snapshot types
pub use snapshot::{FleetSnapshot, StatusSnapshot, TickSnapshot, TrainSnapshot};

// Re-export summary types
pub use summary::{generate_run_id, series_mean, RunSummary};
