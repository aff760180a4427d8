//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // rail-events = { path = "../rail-events", features = ["test-fixtures"] }
//!
//! use rail_events::fixtures;
//!
//! let runs = fixtures::sample_runs();
//! ```

use crate::{
    Direction, FleetSnapshot, RunSummary, SimTimestamp, StatusSnapshot, TickSnapshot,
    TrainSnapshot,
};

/// Returns sample run summaries from the fixtures file.
///
/// Contains 3 runs of a 720-tick day:
/// - 1 undisrupted run (high satisfaction)
/// - 1 run with a single disruption
/// - 1 run with two disruptions (negative mean)
pub fn sample_runs() -> Vec<RunSummary> {
    let jsonl = include_str!("../tests/fixtures/sample_runs.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            RunSummary::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse run line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Returns a small two-fleet snapshot at 00:05.
///
/// The up fleet has one running and one stopped train, the down fleet one
/// train that has not yet departed.
pub fn sample_snapshot() -> TickSnapshot {
    TickSnapshot {
        run_index: 0,
        timestamp: SimTimestamp::at(5),
        average_satisfaction: 88.0,
        fleets: vec![
            FleetSnapshot {
                direction: Direction::Up,
                trains: vec![
                    TrainSnapshot {
                        index: 0,
                        position: 4,
                        station: "小金井".into(),
                        load: 1004,
                        status: StatusSnapshot::Running,
                        satisfaction: 39.76,
                    },
                    TrainSnapshot {
                        index: 1,
                        position: 0,
                        station: "宇都宮".into(),
                        load: 0,
                        status: StatusSnapshot::Stopped { remaining_ticks: 12 },
                        satisfaction: 88.0,
                    },
                ],
            },
            FleetSnapshot {
                direction: Direction::Down,
                trains: vec![TrainSnapshot {
                    index: 0,
                    position: 22,
                    station: "上野".into(),
                    load: 0,
                    status: StatusSnapshot::NotStarted,
                    satisfaction: 100.0,
                }],
            },
        ],
    }
}
