//! Disruption System
//!
//! Random service disruptions (signal failures, accidents). A running train
//! rolls once per tick; when the roll fires, the whole fleet halts.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rail_events::{Direction, SimTimestamp, Tick};

use crate::config::DisruptionConfig;

/// Source of disruption rolls.
///
/// Returns the stop length in ticks when a disruption fires.
pub trait DisruptionSource {
    fn roll(&mut self) -> Option<u32>;
}

/// Disruptions drawn from a seeded random generator.
#[derive(Debug, Clone)]
pub struct RandomDisruptions {
    rng: SmallRng,
    probability: f64,
    min_stop_ticks: u32,
    stop_spread_ticks: u32,
}

impl RandomDisruptions {
    pub fn new(rng: SmallRng, config: &DisruptionConfig) -> Self {
        Self {
            rng,
            probability: config.probability.clamp(0.0, 1.0),
            min_stop_ticks: config.min_stop_ticks,
            stop_spread_ticks: config.stop_spread_ticks.max(1),
        }
    }

    /// Reproducible source for a fixed seed.
    pub fn seeded(seed: u64, config: &DisruptionConfig) -> Self {
        Self::new(SmallRng::seed_from_u64(seed), config)
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy(config: &DisruptionConfig) -> Self {
        Self::new(SmallRng::from_entropy(), config)
    }
}

impl DisruptionSource for RandomDisruptions {
    fn roll(&mut self) -> Option<u32> {
        if self.rng.gen_bool(self.probability) {
            Some(self.min_stop_ticks + self.rng.gen_range(0..self.stop_spread_ticks))
        } else {
            None
        }
    }
}

/// Never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisruptions;

impl DisruptionSource for NoDisruptions {
    fn roll(&mut self) -> Option<u32> {
        None
    }
}

/// Fires on every roll with a fixed stop length.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDisruption {
    pub stop_ticks: u32,
}

impl DisruptionSource for ConstantDisruption {
    fn roll(&mut self) -> Option<u32> {
        Some(self.stop_ticks)
    }
}

/// Resource: the process-wide disruption source.
///
/// Lives for the whole batch so the generator is seeded once, not per run.
#[derive(Resource)]
pub struct DisruptionRoller(pub Box<dyn DisruptionSource + Send + Sync>);

impl DisruptionRoller {
    pub fn new(source: impl DisruptionSource + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// A disruption that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disruption {
    pub tick: Tick,
    pub direction: Direction,
    /// Train whose roll fired
    pub train_index: usize,
    pub stop_ticks: u32,
}

/// Resource: disruptions fired during the current run.
#[derive(Resource, Debug, Default)]
pub struct DisruptionLog {
    records: Vec<Disruption>,
}

impl DisruptionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, disruption: Disruption) {
        tracing::debug!(
            "Disruption at {}: {} train {} halts the line for {} ticks",
            SimTimestamp::at(disruption.tick),
            disruption.direction,
            disruption.train_index,
            disruption.stop_ticks
        );
        self.records.push(disruption);
    }

    pub fn records(&self) -> &[Disruption] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Disruption> {
        std::mem::take(&mut self.records)
    }
}
