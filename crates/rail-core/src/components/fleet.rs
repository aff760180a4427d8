//! Fleet Components
//!
//! All trains serving one direction of the line. Each fleet is spawned as its
//! own entity at the start of a run and despawned when the next run begins.

use bevy_ecs::prelude::*;
use rail_events::{Direction, FleetSnapshot, Tick, TrainSnapshot};

use super::station::StationTable;
use super::train::{Train, TrainStatus};

/// Component: the trains of one direction, in departure order.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Fleet {
    direction: Direction,
    start: usize,
    destination: usize,
    trains: Vec<Train>,
}

impl Fleet {
    /// Builds `size` trains waiting at `start`, departing every `interval`
    /// ticks from `first_departure`.
    ///
    /// Departures past `Tick::MAX` saturate; such trains never depart.
    pub fn initialize(
        size: usize,
        start: usize,
        destination: usize,
        first_departure: Tick,
        interval: Tick,
    ) -> Self {
        let trains = (0..size)
            .map(|i| {
                let offset = Tick::try_from(i)
                    .unwrap_or(Tick::MAX)
                    .saturating_mul(interval);
                Train::new(start, destination, first_departure.saturating_add(offset))
            })
            .collect();

        Self {
            direction: Direction::between(start, destination),
            start,
            destination,
            trains,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn trains_mut(&mut self) -> &mut [Train] {
        &mut self.trains
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Service-wide disruption: halts every train of the fleet that has not
    /// finished, including trains still waiting to depart, for `stop_ticks`.
    ///
    /// Returns the number of trains halted.
    pub fn disrupt(&mut self, stop_ticks: u32) -> usize {
        let mut halted = 0;
        for train in self.trains.iter_mut().filter(|t| !t.status.is_finished()) {
            train.status = TrainStatus::Stopped {
                remaining_ticks: stop_ticks,
            };
            halted += 1;
        }
        halted
    }

    /// Counts every stopped train down by one tick. Trains whose stop expires
    /// go back to `Running`, or to `NotStarted` if their departure is still
    /// ahead of `tick`.
    ///
    /// Returns the number of trains released.
    pub fn release_stopped(&mut self, tick: Tick) -> usize {
        let mut released = 0;
        for train in &mut self.trains {
            let TrainStatus::Stopped { remaining_ticks } = train.status else {
                continue;
            };
            let left = remaining_ticks.saturating_sub(1);
            train.status = if left > 0 {
                TrainStatus::Stopped {
                    remaining_ticks: left,
                }
            } else if train.is_due(tick) {
                released += 1;
                TrainStatus::Running
            } else {
                released += 1;
                TrainStatus::NotStarted
            };
        }
        released
    }

    pub fn finished_count(&self) -> usize {
        self.trains.iter().filter(|t| t.status.is_finished()).count()
    }

    pub fn stopped_count(&self) -> usize {
        self.trains.iter().filter(|t| t.status.is_stopped()).count()
    }

    pub fn satisfaction_sum(&self) -> f64 {
        self.trains.iter().map(|t| t.satisfaction).sum()
    }

    pub fn to_snapshot(&self, stations: &StationTable) -> FleetSnapshot {
        FleetSnapshot {
            direction: self.direction,
            trains: self
                .trains
                .iter()
                .enumerate()
                .map(|(index, train)| TrainSnapshot {
                    index,
                    position: train.position,
                    station: stations.name_at(train.position).to_string(),
                    load: train.load,
                    status: train.status.to_snapshot(),
                    satisfaction: train.satisfaction,
                })
                .collect(),
        }
    }
}
