//! Fleet Setup
//!
//! Plans the two opposing fleets and (re)spawns them at the start of a run.

use bevy_ecs::prelude::*;
use rail_events::{Direction, Tick};

use crate::components::{Fleet, StationTable};
use crate::config::FleetConfig;

/// Everything needed to build one fleet from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetPlan {
    pub direction: Direction,
    pub size: usize,
    pub start: usize,
    pub destination: usize,
    pub first_departure: Tick,
    pub departure_interval: Tick,
}

impl FleetPlan {
    /// Plans for the up fleet (first to last station) and the down fleet
    /// (last to first), in that order.
    pub fn pair(config: &FleetConfig, stations: &StationTable) -> [FleetPlan; 2] {
        let last = stations.last_index();
        [
            FleetPlan {
                direction: Direction::Up,
                size: config.up_trains,
                start: 0,
                destination: last,
                first_departure: config.first_departure,
                departure_interval: config.departure_interval,
            },
            FleetPlan {
                direction: Direction::Down,
                size: config.down_trains,
                start: last,
                destination: 0,
                first_departure: config.first_departure,
                departure_interval: config.departure_interval,
            },
        ]
    }

    pub fn build(&self) -> Fleet {
        Fleet::initialize(
            self.size,
            self.start,
            self.destination,
            self.first_departure,
            self.departure_interval,
        )
    }
}

/// Despawns any fleets left from a previous run and spawns fresh ones.
pub fn respawn_fleets(world: &mut World, plans: &[FleetPlan]) {
    let stale: Vec<Entity> = world
        .query_filtered::<Entity, With<Fleet>>()
        .iter(world)
        .collect();
    for entity in stale {
        world.despawn(entity);
    }

    for plan in plans {
        world.spawn(plan.build());
    }
}

/// Copies of the current fleets, up first.
pub fn collect_fleets(world: &mut World) -> Vec<Fleet> {
    let mut fleets: Vec<Fleet> = world.query::<&Fleet>().iter(world).cloned().collect();
    fleets.sort_by_key(|fleet| fleet.direction());
    fleets
}
