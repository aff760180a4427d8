//! Determinism verification tests
//!
//! Tests to ensure the simulation produces identical results given the same seed.

use rail_core::{DisruptionSource, RandomDisruptions, RunDriver, RunOutcome, SimConfig};

fn seeded_batch(config: &SimConfig, seed: u64, runs: u32) -> Vec<RunOutcome> {
    let mut driver = RunDriver::new(
        config,
        config.station_table(),
        Box::new(RandomDisruptions::seeded(seed, &config.disruption)),
    );
    (0..runs).map(|_| driver.run_once()).collect()
}

/// Test that the disruption source produces identical rolls with the same seed
#[test]
fn test_disruption_roll_determinism() {
    let config = SimConfig::default();

    let mut source1 = RandomDisruptions::seeded(42, &config.disruption);
    let rolls1: Vec<Option<u32>> = (0..10_000).map(|_| source1.roll()).collect();

    let mut source2 = RandomDisruptions::seeded(42, &config.disruption);
    let rolls2: Vec<Option<u32>> = (0..10_000).map(|_| source2.roll()).collect();

    assert_eq!(rolls1, rolls2, "Roll sequences should be identical with same seed");
}

/// Test that a seeded batch replays exactly
#[test]
fn test_batch_determinism() {
    let config = SimConfig::default();

    let first = seeded_batch(&config, 12345, 3);
    let second = seeded_batch(&config, 12345, 3);

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.series, b.series, "Run {} series differ", a.run_index);
        assert_eq!(a.disruptions, b.disruptions, "Run {} disruptions differ", a.run_index);
        assert_eq!(a.fleets, b.fleets, "Run {} final fleets differ", a.run_index);
    }
}

/// Test that the generator carries over between runs instead of reseeding
#[test]
fn test_runs_within_batch_differ() {
    let config = SimConfig::default();

    let batch = seeded_batch(&config, 7, 2);

    // At 1% per running train per tick each fleet is all but certain to halt
    assert!(!batch[0].disruptions.is_empty());
    assert_ne!(
        batch[0].disruptions, batch[1].disruptions,
        "Consecutive runs should draw fresh disruptions"
    );
}

/// Test that different seeds produce different days
#[test]
fn test_different_seeds() {
    let config = SimConfig::default();

    let a = seeded_batch(&config, 42, 1);
    let b = seeded_batch(&config, 43, 1);

    assert_ne!(a[0].disruptions, b[0].disruptions, "Different seeds should produce different days");
}
