//! Train Components
//!
//! A single train's position, load and operating state.

use rail_events::{StatusSnapshot, Tick};

/// Operating state of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    /// Waiting for its scheduled departure
    NotStarted,
    /// Moving one station per tick
    Running,
    /// Halted by a disruption
    Stopped { remaining_ticks: u32 },
    /// Reached its destination. Terminal.
    Finished,
}

impl TrainStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TrainStatus::Finished)
    }

    pub fn is_stopped(self) -> bool {
        matches!(self, TrainStatus::Stopped { .. })
    }

    /// Remaining stop ticks, zero unless stopped.
    pub fn remaining_ticks(self) -> u32 {
        match self {
            TrainStatus::Stopped { remaining_ticks } => remaining_ticks,
            _ => 0,
        }
    }

    pub fn to_snapshot(self) -> StatusSnapshot {
        match self {
            TrainStatus::NotStarted => StatusSnapshot::NotStarted,
            TrainStatus::Running => StatusSnapshot::Running,
            TrainStatus::Stopped { remaining_ticks } => StatusSnapshot::Stopped { remaining_ticks },
            TrainStatus::Finished => StatusSnapshot::Finished,
        }
    }
}

/// One train of a fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    /// Index into the station table
    pub position: usize,
    /// Terminal station index, fixed at initialization
    pub destination: usize,
    /// Cumulative passengers aboard. Nobody alights.
    pub load: u32,
    pub status: TrainStatus,
    pub satisfaction: f64,
    /// Tick at which the train leaves its origin
    pub scheduled_departure: Tick,
}

impl Train {
    /// Initial satisfaction of every train.
    pub const INITIAL_SATISFACTION: f64 = 100.0;

    /// A train waiting at `start` for its departure.
    pub fn new(start: usize, destination: usize, scheduled_departure: Tick) -> Self {
        Self {
            position: start,
            destination,
            load: 0,
            status: TrainStatus::NotStarted,
            satisfaction: Self::INITIAL_SATISFACTION,
            scheduled_departure,
        }
    }

    pub fn has_arrived(&self) -> bool {
        self.position == self.destination
    }

    /// Whether the train is due to depart at `tick`.
    pub fn is_due(&self, tick: Tick) -> bool {
        tick >= self.scheduled_departure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_train() {
        let train = Train::new(0, 22, 30);
        assert_eq!(train.position, 0);
        assert_eq!(train.destination, 22);
        assert_eq!(train.load, 0);
        assert_eq!(train.status, TrainStatus::NotStarted);
        assert_eq!(train.satisfaction, 100.0);
        assert!(!train.is_due(29));
        assert!(train.is_due(30));
    }

    #[test]
    fn test_status_predicates() {
        assert!(TrainStatus::Finished.is_finished());
        assert!(!TrainStatus::Running.is_finished());
        assert!(TrainStatus::Stopped { remaining_ticks: 4 }.is_stopped());
        assert!(!TrainStatus::NotStarted.is_stopped());
        assert_eq!(TrainStatus::Stopped { remaining_ticks: 4 }.remaining_ticks(), 4);
        assert_eq!(TrainStatus::Running.remaining_ticks(), 0);
    }

    #[test]
    fn test_status_snapshot() {
        assert_eq!(
            TrainStatus::Stopped { remaining_ticks: 9 }.to_snapshot(),
            StatusSnapshot::Stopped { remaining_ticks: 9 }
        );
        assert_eq!(TrainStatus::Finished.to_snapshot(), StatusSnapshot::Finished);
    }
}
