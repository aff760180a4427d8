//! End-to-end simulation tests
//!
//! Full-size runs on the reference line, checked through the result sinks
//! and the per-tick snapshot log.

use std::collections::HashMap;
use std::fs;

use rail_core::{
    tick_report, ConstantDisruption, DisruptionScope, DisruptionSource, MemorySink, NoDisruptions,
    RandomDisruptions, ResultSinks, ResultsFile, RunDriver, RunLog, SimConfig, SnapshotWriter,
    StopTimer,
};
use rail_events::{fixtures, Direction, RunSummary, StatusSnapshot, TickSnapshot};
use tempfile::tempdir;

fn reference_driver(config: &SimConfig, seed: u64) -> RunDriver {
    RunDriver::new(
        config,
        config.station_table(),
        Box::new(RandomDisruptions::seeded(seed, &config.disruption)),
    )
}

#[test]
fn test_one_result_line_per_run() {
    let dir = tempdir().unwrap();
    let results_path = dir.path().join("simulation_results.txt");
    let config = SimConfig::default();

    let memory = MemorySink::new();
    let lines = memory.lines_handle();
    let mut sinks = ResultSinks::new()
        .with(ResultsFile::new(&results_path))
        .with(memory);

    let mut driver = reference_driver(&config, 2024);
    let summaries = driver.run_many(3, &mut sinks);

    assert_eq!(summaries.len(), 3);
    assert_eq!(sinks.failures(), 0);

    let content = fs::read_to_string(&results_path).unwrap();
    let file_lines: Vec<&str> = content.lines().collect();
    assert_eq!(file_lines.len(), 3);
    assert_eq!(*lines.lock().unwrap(), file_lines);

    for (line, summary) in file_lines.iter().zip(&summaries) {
        let value: f64 = line.parse().unwrap();
        assert!(value.is_finite());
        let decimals = line.split('.').nth(1).map(str::len);
        assert_eq!(decimals, Some(2), "line {:?} is not two-decimal", line);
        assert_eq!(summary.ticks, 720);
        assert_eq!(summary.total_trains, 96);
        assert!(summary.max_tick_satisfaction <= 100.0);
    }
}

#[test]
fn test_results_file_appends_across_batches() {
    let dir = tempdir().unwrap();
    let results_path = dir.path().join("results.txt");
    let mut config = SimConfig::default();
    config.simulation.steps = 40;

    for seed in [1, 2] {
        let mut sinks = ResultSinks::new().with(ResultsFile::new(&results_path));
        reference_driver(&config, seed).run_many(2, &mut sinks);
    }

    let content = fs::read_to_string(&results_path).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_undisrupted_day() {
    let config = SimConfig::default();
    let mut driver = RunDriver::new(&config, config.station_table(), Box::new(NoDisruptions));

    let outcome = driver.run_once();
    let summary = outcome.summarize();

    // Trains departing after tick 697 cannot cover 22 stations before 720
    assert_eq!(summary.finished_trains, 94);
    assert_eq!(summary.disruptions, 0);
    assert_eq!(summary.max_tick_satisfaction, 100.0);
    assert!(summary.min_tick_satisfaction < 100.0);
    for fleet in &outcome.fleets {
        for train in fleet.trains().iter().filter(|t| t.status.is_finished()) {
            assert_eq!(train.position, fleet.destination());
        }
    }
}

#[test]
fn test_constant_disruption_freezes_the_line() {
    let mut config = SimConfig::default();
    config.simulation.steps = 100;
    let mut driver = RunDriver::new(
        &config,
        config.station_table(),
        Box::new(ConstantDisruption { stop_ticks: 60 }),
    );

    let outcome = driver.run_once();

    // Both fleets halt on tick 0, before any train has moved
    assert_eq!(outcome.disruptions.len(), 2);
    assert!(outcome.disruptions.iter().all(|d| d.tick == 0));
    for fleet in &outcome.fleets {
        assert_eq!(fleet.stopped_count(), 48);
        assert!(fleet.trains().iter().all(|t| t.load == 0));
        assert!(fleet.trains().iter().all(|t| t.position == fleet.start()));
    }
    // Stopped for 60 ticks with no load: 100 - 60
    assert!(outcome.series.iter().all(|&v| v == 40.0));
}

/// Fires on every `n`th roll.
struct EveryNth {
    n: usize,
    rolls: usize,
    stop_ticks: u32,
}

impl DisruptionSource for EveryNth {
    fn roll(&mut self) -> Option<u32> {
        self.rolls += 1;
        (self.rolls % self.n == 0).then_some(self.stop_ticks)
    }
}

#[test]
fn test_decaying_network_disruptions_clear() {
    let mut config = SimConfig::default();
    config.simulation.steps = 300;
    config.fleets.up_trains = 4;
    config.fleets.down_trains = 4;
    config.disruption.scope = DisruptionScope::Network;
    config.disruption.stop_timer = StopTimer::Decaying;

    let source = EveryNth {
        n: 20,
        rolls: 0,
        stop_ticks: 10,
    };
    let mut driver = RunDriver::new(&config, config.station_table(), Box::new(source));
    let outcome = driver.run_once();

    assert!(outcome.disruptions.len() >= 5);
    assert!(outcome.series.iter().any(|&v| v < 100.0 - 9.0));
    assert_eq!(outcome.finished_trains(), 8);
    assert_eq!(*outcome.series.last().unwrap(), 100.0);
}

#[test]
fn test_snapshot_log_invariants() {
    let dir = tempdir().unwrap();
    let snapshot_path = dir.path().join("logs").join("snapshots.jsonl");
    let run_log_path = dir.path().join("runs.jsonl");

    let mut config = SimConfig::default();
    config.simulation.steps = 200;
    config.fleets.up_trains = 6;
    config.fleets.down_trains = 6;
    config.disruption.probability = 0.02;
    config.disruption.stop_timer = StopTimer::Decaying;

    let writer = SnapshotWriter::create(&snapshot_path).unwrap();
    let mut driver = reference_driver(&config, 5).with_snapshots(writer);
    let mut sinks = ResultSinks::new().with(RunLog::new(&run_log_path));
    let summaries = driver.run_many(2, &mut sinks);
    drop(driver);

    let snapshots: Vec<TickSnapshot> = fs::read_to_string(&snapshot_path)
        .unwrap()
        .lines()
        .map(|l| TickSnapshot::from_jsonl(l).unwrap())
        .collect();
    assert_eq!(snapshots.len(), 400);

    // (run, direction, train) -> last seen load and whether it had finished
    let mut seen: HashMap<(u32, Direction, usize), (u32, bool)> = HashMap::new();
    for snapshot in &snapshots {
        assert_eq!(snapshot.fleets.len(), 2);
        for fleet in &snapshot.fleets {
            for train in &fleet.trains {
                assert!(train.position < 23);
                let finished = train.status == StatusSnapshot::Finished;
                let key = (snapshot.run_index, fleet.direction, train.index);
                if let Some(&(load, was_finished)) = seen.get(&key) {
                    assert!(train.load >= load, "load dropped for {:?}", key);
                    if was_finished {
                        assert!(finished, "{:?} left the finished state", key);
                    }
                }
                seen.insert(key, (train.load, finished));
            }
        }
    }

    let logged: Vec<RunSummary> = fs::read_to_string(&run_log_path)
        .unwrap()
        .lines()
        .map(|l| RunSummary::from_jsonl(l).unwrap())
        .collect();
    assert_eq!(logged.len(), 2);
    for (logged, summary) in logged.iter().zip(&summaries) {
        assert_eq!(logged.run_id, summary.run_id);
        assert_eq!(logged.run_index, summary.run_index);
        assert_eq!(logged.disruptions, summary.disruptions);
    }

    // Ordered by run, then tick
    assert_eq!(snapshots[199].run_index, 0);
    assert_eq!(snapshots[199].timestamp.tick, 199);
    assert_eq!(snapshots[200].run_index, 1);
    assert_eq!(snapshots[200].timestamp.tick, 0);
}

#[test]
fn test_fixture_runs_render_as_result_lines() {
    let memory = MemorySink::new();
    let lines = memory.lines_handle();
    let mut sinks = ResultSinks::new().with(memory);

    for summary in fixtures::sample_runs() {
        sinks.record(&summary);
    }

    assert_eq!(*lines.lock().unwrap(), vec!["91.42", "38.07", "-12.88"]);
}

#[test]
fn test_fixture_snapshot_tick_report() {
    let lines = tick_report(&fixtures::sample_snapshot());

    assert_eq!(
        lines,
        vec![
            "Run 0 at 00:05 (tick 5): average satisfaction 88.00",
            "  up: 1 running, 1 stopped, 0 finished, mean satisfaction 63.88",
            "    #0 小金井 load 1004 Running satisfaction 39.76",
            "    #1 宇都宮 load 0 Stopped (12 ticks) satisfaction 88.00",
            "  down: 0 running, 0 stopped, 0 finished, mean satisfaction 100.00",
            "    #0 上野 load 0 Not started satisfaction 100.00",
        ]
    );
}
