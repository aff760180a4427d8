//! Station Components
//!
//! The ordered station list shared read-only by every run.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// A stop on the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Display label
    pub name: String,
    /// Ticks to the next station. Informational only, the tick rule moves
    /// one station per tick regardless.
    pub travel_time: u32,
    /// Passengers using this station per day
    pub daily_passengers: u32,
}

impl Station {
    pub fn new(name: impl Into<String>, travel_time: u32, daily_passengers: u32) -> Self {
        Self {
            name: name.into(),
            travel_time,
            daily_passengers,
        }
    }
}

/// Resource: the ordered stations of the line.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    /// Index of the last station (0 for an empty table).
    pub fn last_index(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }

    /// Clamps a possibly out-of-range index into `[0, last_index]`.
    pub fn clamp_index(&self, index: isize) -> usize {
        index.clamp(0, self.last_index() as isize) as usize
    }

    /// Station name at `index`, or an empty string past the end.
    pub fn name_at(&self, index: usize) -> &str {
        self.get(index).map(|s| s.name.as_str()).unwrap_or("")
    }

    /// Passengers boarding one train at `index` when the station's daily
    /// volume is shared evenly across `divisor` trains.
    ///
    /// Integer division; a zero divisor boards nobody.
    pub fn boarding_at(&self, index: usize, divisor: u32) -> u32 {
        self.get(index)
            .and_then(|s| s.daily_passengers.checked_div(divisor))
            .unwrap_or(0)
    }
}
