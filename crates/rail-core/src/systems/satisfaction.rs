//! Satisfaction System
//!
//! Scores each train from its congestion and any ongoing stop. Trains that
//! are not out on the line score the baseline. There is no floor: heavy
//! loads and long stops drive the score arbitrarily negative.

use bevy_ecs::prelude::*;

use crate::components::{Fleet, Train, TrainStatus};
use crate::config::SimConfig;

use super::SatisfactionSeries;

/// Resource: satisfaction formula parameters.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub baseline: f64,
    pub congestion_weight: f64,
    pub capacity: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            baseline: 100.0,
            congestion_weight: 150.0,
            capacity: 2500,
        }
    }
}

impl ScoringRules {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            baseline: config.scoring.baseline,
            congestion_weight: config.scoring.congestion_weight,
            capacity: config.trains.capacity,
        }
    }

    /// Load as a fraction of capacity.
    pub fn congestion(&self, load: u32) -> f64 {
        load as f64 / self.capacity.max(1) as f64
    }
}

/// Satisfaction of one train in its current state.
pub fn score_train(train: &Train, rules: &ScoringRules) -> f64 {
    match train.status {
        TrainStatus::NotStarted | TrainStatus::Finished => rules.baseline,
        TrainStatus::Running | TrainStatus::Stopped { .. } => {
            let congestion_penalty = rules.congestion_weight * rules.congestion(train.load);
            let stop_penalty = train.status.remaining_ticks() as f64;
            rules.baseline - congestion_penalty - stop_penalty
        }
    }
}

/// Recomputes satisfaction for every train of the fleet.
pub fn score_fleet(fleet: &mut Fleet, rules: &ScoringRules) {
    for train in fleet.trains_mut() {
        train.satisfaction = score_train(train, rules);
    }
}

/// System: Score every fleet after it has advanced.
pub fn score_fleets(rules: Res<ScoringRules>, mut fleets: Query<&mut Fleet>) {
    for mut fleet in &mut fleets {
        score_fleet(&mut fleet, &rules);
    }
}

/// System: Append this tick's mean satisfaction across all trains.
pub fn record_tick_satisfaction(fleets: Query<&Fleet>, mut series: ResMut<SatisfactionSeries>) {
    let (sum, count) = fleets
        .iter()
        .fold((0.0, 0usize), |(sum, count), fleet| {
            (sum + fleet.satisfaction_sum(), count + fleet.len())
        });

    let mean = if count == 0 { 0.0 } else { sum / count as f64 };
    series.push(mean);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_with(status: TrainStatus, load: u32) -> Train {
        let mut train = Train::new(0, 22, 0);
        train.status = status;
        train.load = load;
        train
    }

    #[test]
    fn test_idle_trains_score_baseline() {
        let rules = ScoringRules::default();
        assert_eq!(score_train(&train_with(TrainStatus::NotStarted, 0), &rules), 100.0);
        // Load is ignored once finished
        assert_eq!(score_train(&train_with(TrainStatus::Finished, 9000), &rules), 100.0);
    }

    #[test]
    fn test_congestion_penalty() {
        let rules = ScoringRules::default();
        // 1250 / 2500 = 0.5 congestion -> 75 penalty
        assert_eq!(score_train(&train_with(TrainStatus::Running, 1250), &rules), 25.0);
        assert_eq!(score_train(&train_with(TrainStatus::Running, 0), &rules), 100.0);
    }

    #[test]
    fn test_stop_penalty() {
        let rules = ScoringRules::default();
        let stopped = train_with(TrainStatus::Stopped { remaining_ticks: 40 }, 500);
        // 100 - 150 * 0.2 - 40
        assert!((score_train(&stopped, &rules) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_floor() {
        let rules = ScoringRules::default();
        let crushed = train_with(TrainStatus::Stopped { remaining_ticks: 104 }, 5000);
        assert!((score_train(&crushed, &rules) - (-304.0)).abs() < 1e-9);
    }

    #[test]
    fn test_score_fleet_updates_every_train() {
        let rules = ScoringRules::default();
        let mut fleet = Fleet::initialize(3, 0, 22, 0, 15);
        fleet.trains_mut()[0].status = TrainStatus::Running;
        fleet.trains_mut()[0].load = 2500;
        fleet.trains_mut()[1].satisfaction = -12.0;

        score_fleet(&mut fleet, &rules);

        assert_eq!(fleet.trains()[0].satisfaction, -50.0);
        assert_eq!(fleet.trains()[1].satisfaction, 100.0);
        assert_eq!(fleet.trains()[2].satisfaction, 100.0);
    }

    #[test]
    fn test_record_tick_satisfaction_averages_both_fleets() {
        let mut world = World::new();
        world.insert_resource(SatisfactionSeries::default());

        let mut up = Fleet::initialize(1, 0, 22, 0, 15);
        up.trains_mut()[0].satisfaction = 40.0;
        let mut down = Fleet::initialize(3, 22, 0, 0, 15);
        for train in down.trains_mut() {
            train.satisfaction = 80.0;
        }
        world.spawn(up);
        world.spawn(down);

        let mut schedule = Schedule::default();
        schedule.add_systems(record_tick_satisfaction);
        schedule.run(&mut world);

        let series = world.resource::<SatisfactionSeries>();
        assert_eq!(series.values(), &[70.0]);
    }
}
