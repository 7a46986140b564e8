//! Domain error types.
//!
//! These errors represent invariant violations of the value types that flow
//! into the router. They are raised when the values are built, never during
//! a search.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A distance was negative.
    #[error("distance must be non-negative, got {0}m")]
    NegativeDistance(i32),

    /// A duration was negative.
    #[error("duration must be non-negative, got {0}s")]
    NegativeDuration(i32),

    /// A cost was negative.
    #[error("cost must be non-negative, got {0}")]
    NegativeCost(i32),

    /// Opening hours closing before they open.
    #[error("opening hours close at {close} before opening at {open}")]
    InvalidOpeningHours { open: i32, close: i32 },

    /// A duration exceeded `MAX_LEG_DURATION`.
    #[error("duration of {0}s is longer than any real journey")]
    DurationTooLong(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::NegativeDistance(-3);
        assert_eq!(err.to_string(), "distance must be non-negative, got -3m");

        let err = DomainError::NegativeDuration(-1);
        assert_eq!(err.to_string(), "duration must be non-negative, got -1s");

        let err = DomainError::NegativeCost(-5);
        assert_eq!(err.to_string(), "cost must be non-negative, got -5");

        let err = DomainError::DurationTooLong(3_000_000);
        assert_eq!(
            err.to_string(),
            "duration of 3000000s is longer than any real journey"
        );
    }
}
