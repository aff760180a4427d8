//! Tick Advance System
//!
//! Moves every train of every fleet forward by one tick:
//! 1. Waiting trains whose departure is due start running
//! 2. Running trains, including ones that just started, roll for a
//!    disruption, which halts the whole fleet
//! 3. Running trains that were not halted and did not just start move one
//!    station and board passengers, finishing when they reach their
//!    destination
//!
//! With the decaying stop timer, stopped trains count down before any of
//! the above and rejoin once their stop expires.

use bevy_ecs::prelude::*;
use rail_events::{Direction, Tick};

use crate::components::{Fleet, StationTable, Train, TrainStatus};
use crate::config::{DisruptionScope, SimConfig, StopTimer};

use super::disruption::{Disruption, DisruptionLog, DisruptionRoller, DisruptionSource};
use super::SimulationState;

/// Resource: rules shared by every fleet's tick advance.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingRules {
    /// Trains across both directions; each station's daily volume is split
    /// evenly across this many trains.
    pub boarding_divisor: u32,
    pub stop_timer: StopTimer,
    pub scope: DisruptionScope,
}

impl OperatingRules {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            boarding_divisor: u32::try_from(config.total_trains()).unwrap_or(u32::MAX),
            stop_timer: config.disruption.stop_timer,
            scope: config.disruption.scope,
        }
    }
}

/// Advances one fleet by a single tick.
///
/// Trains are evaluated in index order. Returns the disruption that fired,
/// if any; once one fires every unfinished train is stopped, so at most one
/// fires per fleet per tick.
pub fn advance_fleet(
    fleet: &mut Fleet,
    tick: Tick,
    stations: &StationTable,
    rules: &OperatingRules,
    source: &mut dyn DisruptionSource,
) -> Option<Disruption> {
    if rules.stop_timer == StopTimer::Decaying {
        fleet.release_stopped(tick);
    }
    step_fleet(fleet, tick, stations, rules, source)
}

/// The advance proper, after any stop countdown.
fn step_fleet(
    fleet: &mut Fleet,
    tick: Tick,
    stations: &StationTable,
    rules: &OperatingRules,
    source: &mut dyn DisruptionSource,
) -> Option<Disruption> {
    let direction = fleet.direction();
    let mut fired = None;

    for index in 0..fleet.len() {
        let train = &mut fleet.trains_mut()[index];
        let started = match train.status {
            TrainStatus::NotStarted if train.is_due(tick) => {
                train.status = TrainStatus::Running;
                true
            }
            TrainStatus::Running => false,
            TrainStatus::NotStarted | TrainStatus::Stopped { .. } | TrainStatus::Finished => {
                continue
            }
        };

        if let Some(stop_ticks) = source.roll() {
            fleet.disrupt(stop_ticks);
            fired = Some(Disruption {
                tick,
                direction,
                train_index: index,
                stop_ticks,
            });
            continue;
        }

        // Departing uses up the tick's movement
        if !started {
            let train = &mut fleet.trains_mut()[index];
            move_and_board(train, direction, stations, rules.boarding_divisor);
        }
    }

    fired
}

/// One station forward, clamped to the line, then boarding.
fn move_and_board(train: &mut Train, direction: Direction, stations: &StationTable, divisor: u32) {
    let next = train.position as isize + direction.step();
    train.position = stations.clamp_index(next);
    train.load = train
        .load
        .saturating_add(stations.boarding_at(train.position, divisor));

    if train.has_arrived() {
        train.status = TrainStatus::Finished;
    }
}

/// System: Advance every fleet by one tick, up fleet first.
///
/// Stop timers of every fleet count down before any fleet moves. Under
/// network scope a disruption in one fleet also halts the other.
pub fn advance_fleets(
    state: Res<SimulationState>,
    stations: Res<StationTable>,
    rules: Res<OperatingRules>,
    mut roller: ResMut<DisruptionRoller>,
    mut log: ResMut<DisruptionLog>,
    mut fleets: Query<&mut Fleet>,
) {
    let mut fleets: Vec<Mut<Fleet>> = fleets.iter_mut().collect();
    fleets.sort_by_key(|fleet| fleet.direction());

    if rules.stop_timer == StopTimer::Decaying {
        for fleet in fleets.iter_mut() {
            fleet.release_stopped(state.current_tick);
        }
    }

    for i in 0..fleets.len() {
        let fired = step_fleet(
            &mut fleets[i],
            state.current_tick,
            &stations,
            &rules,
            roller.0.as_mut(),
        );

        let Some(disruption) = fired else {
            continue;
        };
        if rules.scope == DisruptionScope::Network {
            for (j, other) in fleets.iter_mut().enumerate() {
                if j != i {
                    other.disrupt(disruption.stop_ticks);
                }
            }
        }
        log.record(disruption);
    }
}
