//! Errors detected before a search runs.

use crate::domain::{DomainError, StopIndex};

/// Error setting up a search.
///
/// Once a search has been set up it always completes; an empty result is
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Forward searches need a departure time.
    #[error("earliest departure time required for a forward search")]
    MissingDepartureTime,

    /// Reverse searches need an arrival time.
    #[error("latest arrival time required for a reverse search")]
    MissingArrivalTime,

    #[error("search window must be non-negative, got {0}s")]
    InvalidSearchWindow(i32),

    #[error("no access paths")]
    NoAccess,

    #[error("no egress paths")]
    NoEgress,

    /// An access or egress path starts or ends at a stop not in the schedule.
    #[error("access or egress at unknown stop {0}")]
    UnknownStop(StopIndex),

    /// A pass-through point is empty or names a stop not in the schedule.
    #[error("pass-through point {point} is invalid: {reason}")]
    InvalidPassThroughPoint { point: usize, reason: &'static str },

    /// The transfer index was built for a different schedule.
    #[error("transfer index covers {actual} stops, schedule has {expected}")]
    TransferIndexMismatch { expected: usize, actual: usize },

    /// A time penalty was applied to an access or egress path twice.
    #[error("time penalty already applied to access/egress at stop {0}")]
    TimePenaltyAlreadyApplied(StopIndex),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            SearchError::InvalidSearchWindow(-5).to_string(),
            "search window must be non-negative, got -5s"
        );
        assert_eq!(
            SearchError::InvalidPassThroughPoint {
                point: 1,
                reason: "empty"
            }
            .to_string(),
            "pass-through point 1 is invalid: empty"
        );
        let err: SearchError = DomainError::NegativeDuration(-3).into();
        assert_eq!(err.to_string(), "duration must be non-negative, got -3s");
    }
}
