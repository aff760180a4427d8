//! ECS Systems
//!
//! The per-tick pipeline: advance fleets, score trains, record the mean.

pub mod advance;
pub mod disruption;
pub mod satisfaction;

use bevy_ecs::prelude::*;
use rail_events::Tick;

pub use advance::{advance_fleet, advance_fleets, OperatingRules};
pub use disruption::{
    ConstantDisruption, Disruption, DisruptionLog, DisruptionRoller, DisruptionSource,
    NoDisruptions, RandomDisruptions,
};
pub use satisfaction::{
    record_tick_satisfaction, score_fleet, score_fleets, score_train, ScoringRules,
};

/// Global simulation state resource
#[derive(Resource, Debug, Clone, Default)]
pub struct SimulationState {
    pub current_tick: Tick,
    /// Ticks per run
    pub steps: Tick,
    /// Zero-based index of the run in progress
    pub run_index: u32,
}

impl SimulationState {
    pub fn new(steps: Tick) -> Self {
        Self {
            current_tick: 0,
            steps,
            run_index: 0,
        }
    }
}

/// Resource: mean satisfaction across all trains, one entry per tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct SatisfactionSeries(Vec<f64>);

impl SatisfactionSeries {
    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hands off the series and leaves an empty one for the next run.
    pub fn take(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.0)
    }
}
