//! Ordered pass-through points, tracked in the c2 criterion.
//!
//! c2 counts how many points have been visited so far, in order. A path is
//! only complete when it has visited all of them.

use crate::domain::StopIndex;

use super::{SearchDirection, SearchError};

#[derive(Debug, Clone, Default)]
pub struct PassThroughPoints {
    /// Sorted stops per point, in search order.
    points: Vec<Vec<StopIndex>>,
}

impl PassThroughPoints {
    /// Validate points against the schedule. Reverse searches visit the
    /// points last to first.
    pub fn new(
        points: &[Vec<StopIndex>],
        direction: SearchDirection,
        number_of_stops: usize,
    ) -> Result<Self, SearchError> {
        let mut validated = Vec::with_capacity(points.len());
        for (i, stops) in points.iter().enumerate() {
            if stops.is_empty() {
                return Err(SearchError::InvalidPassThroughPoint {
                    point: i,
                    reason: "no stops",
                });
            }
            if stops.iter().any(|s| s.index() >= number_of_stops) {
                return Err(SearchError::InvalidPassThroughPoint {
                    point: i,
                    reason: "unknown stop",
                });
            }
            let mut sorted = stops.clone();
            sorted.sort_unstable();
            sorted.dedup();
            validated.push(sorted);
        }
        if !direction.is_forward() {
            validated.reverse();
        }
        Ok(Self { points: validated })
    }

    pub fn is_enabled(&self) -> bool {
        !self.points.is_empty()
    }

    /// The c2 value after visiting `stop`.
    pub fn update(&self, c2: i32, stop: StopIndex) -> i32 {
        match self.points.get(c2 as usize) {
            Some(next) if next.binary_search(&stop).is_ok() => c2 + 1,
            _ => c2,
        }
    }

    pub fn is_satisfied(&self, c2: i32) -> bool {
        c2 as usize == self.points.len()
    }
}
