//! Simulation Timestamp Types
//!
//! Ticks are simulated minutes counted from the start of service at 00:00.
//! This module renders them as wall-clock style service times.
//!
//! # Example
//!
//! ```
//! use rail_events::{ServiceTime, SimTimestamp};
//!
//! let ts = SimTimestamp::at(135);
//! assert_eq!(ts.tick, 135);
//! assert_eq!(ts.time.to_string(), "02:15");
//! assert_eq!(ServiceTime::from_tick(1500).to_string(), "day_2 01:00");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A simulation tick. One tick is one simulated minute.
pub type Tick = u32;

/// Number of ticks per simulated hour.
pub const TICKS_PER_HOUR: Tick = 60;

/// Number of ticks per simulated service day.
pub const TICKS_PER_DAY: Tick = 24 * TICKS_PER_HOUR;

/// Clock time of a tick within the service day.
///
/// Serializes to strings like "05:12", or "day_2 05:12" once the run
/// crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTime {
    /// Zero-based service day.
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
}

impl ServiceTime {
    /// Creates a new ServiceTime.
    pub fn new(day: u32, hour: u8, minute: u8) -> Self {
        Self { day, hour, minute }
    }

    /// Converts a tick into its service time.
    pub fn from_tick(tick: Tick) -> Self {
        let day = tick / TICKS_PER_DAY;
        let within_day = tick % TICKS_PER_DAY;
        Self {
            day,
            hour: (within_day / TICKS_PER_HOUR) as u8,
            minute: (within_day % TICKS_PER_HOUR) as u8,
        }
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.day > 0 {
            write!(f, "day_{} ", self.day + 1)?;
        }
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Error type for parsing ServiceTime from strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTimeError {
    InvalidFormat(String),
    InvalidDay(String),
    InvalidHour(String),
    InvalidMinute(String),
}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTimeError::InvalidFormat(s) => {
                write!(f, "invalid service time: '{}', expected '[day_N ]HH:MM'", s)
            }
            ParseTimeError::InvalidDay(s) => write!(f, "invalid day: '{}'", s),
            ParseTimeError::InvalidHour(s) => write!(f, "invalid hour: '{}'", s),
            ParseTimeError::InvalidMinute(s) => write!(f, "invalid minute: '{}'", s),
        }
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for ServiceTime {
    type Err = ParseTimeError;

    /// Parses a ServiceTime from "05:12" or "day_2 05:12".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, clock) = match s.split_once(' ') {
            Some((day_part, clock)) => {
                let day = day_part
                    .strip_prefix("day_")
                    .ok_or_else(|| ParseTimeError::InvalidFormat(s.to_string()))?
                    .parse::<u32>()
                    .map_err(|_| ParseTimeError::InvalidDay(day_part.to_string()))?;
                if day == 0 {
                    return Err(ParseTimeError::InvalidDay(day_part.to_string()));
                }
                (day - 1, clock)
            }
            None => (0, s),
        };

        let (hour_part, minute_part) = clock
            .split_once(':')
            .ok_or_else(|| ParseTimeError::InvalidFormat(s.to_string()))?;
        let hour = hour_part
            .parse::<u8>()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| ParseTimeError::InvalidHour(hour_part.to_string()))?;
        let minute = minute_part
            .parse::<u8>()
            .ok()
            .filter(|m| *m < 60)
            .ok_or_else(|| ParseTimeError::InvalidMinute(minute_part.to_string()))?;

        Ok(ServiceTime::new(day, hour, minute))
    }
}

impl Serialize for ServiceTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ServiceTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A point in simulation time: the raw tick plus its service time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimTimestamp {
    pub tick: Tick,
    pub time: ServiceTime,
}

impl SimTimestamp {
    /// Creates the timestamp for a tick.
    pub fn at(tick: Tick) -> Self {
        Self {
            tick,
            time: ServiceTime::from_tick(tick),
        }
    }
}

impl fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tick {})", self.time, self.tick)
    }
}
