//! Schedule construction errors.

use crate::domain::{PatternIndex, StopIndex, TimeError};

/// Errors detected while building the per-day schedule.
///
/// All of these are raised when the schedule is built, before any search runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A pattern needs at least two stops to be ridden.
    #[error("pattern {0:?} must have at least two stops")]
    TooFewStops(String),

    /// A pattern refers to a stop that does not exist.
    #[error("pattern {pattern:?} refers to unknown stop {stop}")]
    UnknownStop { pattern: String, stop: StopIndex },

    /// A constrained transfer refers to a trip that does not exist.
    #[error("unknown trip {trip} in pattern {pattern:?}")]
    UnknownTrip { pattern: PatternIndex, trip: usize },

    /// A trip's stop-time arrays do not match the pattern.
    #[error("trip {trip:?} has {actual} stop times, pattern has {expected} stops")]
    WrongNumberOfStopTimes {
        trip: String,
        expected: usize,
        actual: usize,
    },

    /// Stop times of a trip go backwards.
    #[error("trip {trip:?} has decreasing stop times at position {position}")]
    DecreasingStopTimes { trip: String, position: usize },

    /// Two trips of one pattern overtake each other, so the timetable cannot
    /// be searched by departure time.
    #[error("trips {first:?} and {second:?} overtake each other at position {position}")]
    OvertakingTrips {
        first: String,
        second: String,
        position: usize,
    },

    /// A frequency entry cannot be expanded.
    #[error("invalid frequency entry for {trip:?}: {reason}")]
    InvalidFrequency { trip: String, reason: &'static str },

    /// A stop time string could not be parsed.
    #[error("invalid stop time: {0}")]
    Time(#[from] TimeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScheduleError::TooFewStops("R1".into());
        assert_eq!(err.to_string(), "pattern \"R1\" must have at least two stops");

        let err = ScheduleError::UnknownStop {
            pattern: "R1".into(),
            stop: StopIndex(9),
        };
        assert_eq!(err.to_string(), "pattern \"R1\" refers to unknown stop 9");

        let err = ScheduleError::OvertakingTrips {
            first: "a".into(),
            second: "b".into(),
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "trips \"a\" and \"b\" overtake each other at position 2"
        );
    }
}
