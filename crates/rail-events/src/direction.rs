//! Service direction along the line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a fleet runs along the ordered station list.
///
/// `Up` runs from the first station toward the last, `Down` the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction implied by a start and destination index.
    ///
    /// Anything that is not strictly ahead counts as `Down`.
    pub fn between(start: usize, destination: usize) -> Self {
        if destination > start {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Index step taken per move.
    pub fn step(self) -> isize {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}
