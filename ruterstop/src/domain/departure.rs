//! Departure records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction: {0} (expected inbound or outbound)")]
pub struct InvalidDirection(pub String);

/// Upstream-assigned travel direction of a service journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Both directions, i.e. no filtering.
    pub const ALL: [Direction; 2] = [Direction::Inbound, Direction::Outbound];

    /// The wire name used by the journey planner.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Direction::Inbound),
            "outbound" => Ok(Direction::Outbound),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single departure from a stop.
///
/// Plain value type. Display formatting lives in [`crate::pipeline`] so that
/// grouping can build merged departures freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Public line code, e.g. "31". Merged departures carry "20, 21".
    pub line: String,
    /// Destination text, ASCII-normalized. May be empty.
    pub name: String,
    /// Expected arrival at the stop, local wall-clock time.
    pub eta: NaiveDateTime,
    pub direction: Direction,
    /// Whether `eta` comes from live vehicle tracking.
    pub realtime: bool,
}

impl Departure {
    /// Create a scheduled (non-realtime) departure.
    pub fn new(
        line: impl Into<String>,
        name: impl Into<String>,
        eta: NaiveDateTime,
        direction: Direction,
    ) -> Self {
        Self {
            line: line.into(),
            name: name.into(),
            eta,
            direction,
            realtime: false,
        }
    }

    /// Mark whether the ETA is backed by live tracking.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }
}
