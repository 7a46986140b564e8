//! Dense index types for stops, patterns and trips.
//!
//! The per-day schedule numbers stops and patterns consecutively from zero so
//! the search can keep per-stop state in plain vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a stop in the per-day schedule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopIndex(pub usize);

impl StopIndex {
    /// Returns the raw index, for addressing per-stop vectors.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for StopIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stop({})", self.0)
    }
}

impl fmt::Display for StopIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a trip pattern in the per-day schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternIndex(pub usize);

impl PatternIndex {
    /// Returns the raw index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifies one trip: its pattern and its position in that pattern's
/// timetable (the trip sort index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripRef {
    pub pattern: PatternIndex,
    pub trip: usize,
}

impl TripRef {
    pub fn new(pattern: PatternIndex, trip: usize) -> Self {
        Self { pattern, trip }
    }
}

impl fmt::Display for TripRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}#{}", self.pattern.0, self.trip)
    }
}
