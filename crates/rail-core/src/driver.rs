//! Run Driver
//!
//! Owns the ECS world for a batch of runs. The station table, operating
//! rules and disruption source are inserted once; each run respawns the
//! fleets and steps the schedule `steps` times.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rail_events::{RunSummary, Tick};

use crate::components::{Fleet, StationTable};
use crate::config::SimConfig;
use crate::output::{capture_snapshot, tick_report, ResultSinks, SnapshotWriter};
use crate::setup::{collect_fleets, respawn_fleets, FleetPlan};
use crate::systems::{
    advance_fleets, record_tick_satisfaction, score_fleets, Disruption, DisruptionLog,
    DisruptionRoller, DisruptionSource, OperatingRules, SatisfactionSeries, ScoringRules,
    SimulationState,
};

/// Builds the per-tick schedule: advance, then score, then record.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((advance_fleets, score_fleets, record_tick_satisfaction).chain());
    schedule
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_index: u32,
    /// Mean satisfaction across all trains, one entry per tick
    pub series: Vec<f64>,
    pub disruptions: Vec<Disruption>,
    /// Final state of the fleets, up first
    pub fleets: Vec<Fleet>,
}

impl RunOutcome {
    pub fn finished_trains(&self) -> usize {
        self.fleets.iter().map(Fleet::finished_count).sum()
    }

    pub fn total_trains(&self) -> usize {
        self.fleets.iter().map(Fleet::len).sum()
    }

    pub fn summarize(&self) -> RunSummary {
        RunSummary::from_series(
            self.run_index,
            &self.series,
            self.disruptions.len() as u32,
            self.finished_trains() as u32,
            self.total_trains() as u32,
        )
    }
}

/// Runs the simulation, once or in batches.
pub struct RunDriver {
    world: World,
    schedule: Schedule,
    plans: [FleetPlan; 2],
    steps: Tick,
    snapshots: Option<SnapshotWriter>,
    runs_completed: u32,
}

impl RunDriver {
    /// Sets up the world for `config`. The disruption source is kept for the
    /// driver's lifetime and never reseeded between runs.
    pub fn new(
        config: &SimConfig,
        stations: StationTable,
        source: Box<dyn DisruptionSource + Send + Sync>,
    ) -> Self {
        let plans = FleetPlan::pair(&config.fleets, &stations);
        let steps = config.simulation.steps;

        let mut world = World::new();
        world.insert_resource(SimulationState::new(steps));
        world.insert_resource(OperatingRules::from_config(config));
        world.insert_resource(ScoringRules::from_config(config));
        world.insert_resource(stations);
        world.insert_resource(DisruptionRoller(source));
        world.insert_resource(DisruptionLog::new());
        world.insert_resource(SatisfactionSeries::default());

        Self {
            world,
            schedule: simulation_schedule(),
            plans,
            steps,
            snapshots: None,
            runs_completed: 0,
        }
    }

    /// Records a snapshot of every tick of every following run.
    pub fn with_snapshots(mut self, writer: SnapshotWriter) -> Self {
        self.snapshots = Some(writer);
        self
    }

    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    /// Simulates one full run from fresh fleets.
    ///
    /// With trace logging enabled every tick is also reported train by train.
    pub fn run_once(&mut self) -> RunOutcome {
        let run_index = self.runs_completed;
        let report = tracing::enabled!(tracing::Level::TRACE);
        self.reset(run_index);

        for tick in 0..self.steps {
            self.world.resource_mut::<SimulationState>().current_tick = tick;
            self.schedule.run(&mut self.world);

            if !report && self.snapshots.is_none() {
                continue;
            }
            let snapshot = capture_snapshot(&mut self.world, run_index, tick);
            if report {
                for line in tick_report(&snapshot) {
                    tracing::trace!("{}", line);
                }
            }
            if let Some(writer) = self.snapshots.as_mut() {
                if let Err(e) = writer.write(&snapshot) {
                    tracing::warn!("Disabling snapshot log after write failure: {}", e);
                    self.snapshots = None;
                }
            }
        }

        let outcome = RunOutcome {
            run_index,
            series: self.world.resource_mut::<SatisfactionSeries>().take(),
            disruptions: self.world.resource_mut::<DisruptionLog>().drain(),
            fleets: collect_fleets(&mut self.world),
        };
        self.runs_completed += 1;
        outcome
    }

    /// Simulates `runs` independent runs, handing each summary to `sinks`.
    pub fn run_many(&mut self, runs: u32, sinks: &mut ResultSinks) -> Vec<RunSummary> {
        let mut summaries = Vec::with_capacity(runs as usize);

        for _ in 0..runs {
            let outcome = self.run_once();
            let summary = outcome.summarize();
            tracing::info!(
                "Run {:>3}: mean satisfaction {:.2} ({} disruptions, {}/{} trains finished)",
                summary.run_index,
                summary.mean_satisfaction,
                summary.disruptions,
                summary.finished_trains,
                summary.total_trains
            );
            sinks.record(&summary);
            summaries.push(summary);
        }

        if let Some(writer) = self.snapshots.as_mut() {
            if let Err(e) = writer.flush() {
                tracing::warn!("Failed to flush snapshot log: {}", e);
            }
        }
        summaries
    }

    fn reset(&mut self, run_index: u32) {
        respawn_fleets(&mut self.world, &self.plans);
        {
            let mut state = self.world.resource_mut::<SimulationState>();
            state.current_tick = 0;
            state.run_index = run_index;
        }
        self.world.resource_mut::<SatisfactionSeries>().take();
        self.world.resource_mut::<DisruptionLog>().drain();
    }
}
