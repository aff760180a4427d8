//! World Setup
//!
//! Builds the station table and the fleets for each run.

pub mod fleets;
pub mod stations;

pub use fleets::{collect_fleets, respawn_fleets, FleetPlan};
pub use stations::reference_stations;
