//! ECS Components and Resources
//!
//! Stations, trains and fleets.

pub mod fleet;
pub mod station;
pub mod train;

pub use fleet::Fleet;
pub use station::{Station, StationTable};
pub use train::{Train, TrainStatus};
