//! Access and egress paths between the origin/destination and stops.

use crate::domain::{DomainError, MAX_LEG_DURATION, StopIndex, to_router_cost};

use super::SearchError;

/// Times a path may start, as seconds since service-day midnight.
///
/// Both ends are inclusive. Flexible services and parking facilities are
/// only usable within these hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: i32,
    pub close: i32,
}

/// A street (or flexible transit) path from the origin to a stop, or from a
/// stop to the destination.
///
/// Produced by an external street search; the router only needs the stop,
/// duration and cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEgress {
    stop: StopIndex,
    duration: i32,
    c1: i32,
    number_of_rides: u32,
    stop_reached_on_board: bool,
    time_penalty: Option<i32>,
    opening_hours: Option<OpeningHours>,
}

impl AccessEgress {
    /// Create a path; `c1` is in router cost units.
    pub fn new(stop: StopIndex, duration: i32, c1: i32) -> Result<Self, DomainError> {
        if duration < 0 {
            return Err(DomainError::NegativeDuration(duration));
        }
        if duration > MAX_LEG_DURATION {
            return Err(DomainError::DurationTooLong(duration));
        }
        if c1 < 0 {
            return Err(DomainError::NegativeCost(c1));
        }
        Ok(Self {
            stop,
            duration,
            c1,
            number_of_rides: 0,
            stop_reached_on_board: false,
            time_penalty: None,
            opening_hours: None,
        })
    }

    /// A path including `rides` transit rides (e.g. flexible services).
    ///
    /// `on_board` marks paths that reach the stop in a vehicle, so a
    /// transfer may directly follow or precede them.
    pub fn with_rides(mut self, rides: u32, on_board: bool) -> Self {
        self.number_of_rides = rides;
        self.stop_reached_on_board = rides > 0 && on_board;
        self
    }

    /// Add a time penalty; it is charged as cost, not as travel time.
    pub fn with_time_penalty(mut self, penalty: i32) -> Result<Self, SearchError> {
        if self.time_penalty.is_some() {
            return Err(SearchError::TimePenaltyAlreadyApplied(self.stop));
        }
        if penalty < 0 {
            return Err(DomainError::NegativeDuration(penalty).into());
        }
        if penalty > MAX_LEG_DURATION {
            return Err(DomainError::DurationTooLong(penalty).into());
        }
        self.time_penalty = Some(penalty);
        Ok(self)
    }

    /// Restrict the path to depart between `open` and `close`.
    pub fn with_opening_hours(mut self, open: i32, close: i32) -> Result<Self, DomainError> {
        if close < open {
            return Err(DomainError::InvalidOpeningHours { open, close });
        }
        self.opening_hours = Some(OpeningHours { open, close });
        Ok(self)
    }

    pub fn stop(&self) -> StopIndex {
        self.stop
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Cost including any time penalty.
    pub fn c1(&self) -> i32 {
        self.c1
            .saturating_add(to_router_cost(self.time_penalty.unwrap_or(0)))
    }

    pub fn number_of_rides(&self) -> u32 {
        self.number_of_rides
    }

    pub fn has_rides(&self) -> bool {
        self.number_of_rides > 0
    }

    pub fn stop_reached_on_board(&self) -> bool {
        self.stop_reached_on_board
    }

    pub fn time_penalty(&self) -> Option<i32> {
        self.time_penalty
    }

    pub fn opening_hours(&self) -> Option<OpeningHours> {
        self.opening_hours
    }

    /// The earliest departure at or after `time`, or `None` if the path
    /// has closed by then.
    pub fn earliest_departure_time(&self, time: i32) -> Option<i32> {
        match self.opening_hours {
            None => Some(time),
            Some(OpeningHours { open, .. }) if time < open => Some(open),
            Some(OpeningHours { close, .. }) if time > close => None,
            Some(_) => Some(time),
        }
    }

    /// The latest arrival at or before `time`, or `None` if the path has
    /// not opened yet.
    pub fn latest_arrival_time(&self, time: i32) -> Option<i32> {
        let Some(OpeningHours { open, close }) = self.opening_hours else {
            return Some(time);
        };
        let first = open.saturating_add(self.duration);
        let last = close.saturating_add(self.duration);
        if time > last {
            Some(last)
        } else if time < first {
            None
        } else {
            Some(time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_rejected() {
        assert_eq!(
            AccessEgress::new(StopIndex(0), -1, 0),
            Err(DomainError::NegativeDuration(-1))
        );
        assert_eq!(
            AccessEgress::new(StopIndex(0), 1, -5),
            Err(DomainError::NegativeCost(-5))
        );
    }

    #[test]
    fn endless_path_rejected() {
        assert_eq!(
            AccessEgress::new(StopIndex(0), i32::MAX, 0),
            Err(DomainError::DurationTooLong(i32::MAX))
        );
        assert!(AccessEgress::new(StopIndex(0), MAX_LEG_DURATION, 0).is_ok());

        let path = AccessEgress::new(StopIndex(0), 60, 0).unwrap();
        assert_eq!(
            path.with_time_penalty(i32::MAX),
            Err(SearchError::Domain(DomainError::DurationTooLong(i32::MAX)))
        );
    }

    #[test]
    fn walking_path() {
        let path = AccessEgress::new(StopIndex(2), 300, 60_000).unwrap();
        assert_eq!(path.stop(), StopIndex(2));
        assert_eq!(path.duration(), 300);
        assert_eq!(path.c1(), 60_000);
        assert!(!path.has_rides());
        assert!(!path.stop_reached_on_board());
    }

    #[test]
    fn on_board_needs_rides() {
        let path = AccessEgress::new(StopIndex(0), 0, 0).unwrap().with_rides(0, true);
        assert!(!path.stop_reached_on_board());
        let flex = AccessEgress::new(StopIndex(0), 0, 0).unwrap().with_rides(1, true);
        assert!(flex.stop_reached_on_board());
        assert_eq!(flex.number_of_rides(), 1);
    }

    #[test]
    fn time_penalty_is_cost() {
        let path = AccessEgress::new(StopIndex(0), 100, 1000)
            .unwrap()
            .with_time_penalty(60)
            .unwrap();
        assert_eq!(path.duration(), 100);
        assert_eq!(path.c1(), 1000 + 6000);
        assert_eq!(path.time_penalty(), Some(60));
    }

    #[test]
    fn opening_hours_shift_departure() {
        let path = AccessEgress::new(StopIndex(0), 300, 0)
            .unwrap()
            .with_opening_hours(32_400, 35_400)
            .unwrap();
        assert_eq!(path.earliest_departure_time(30_000), Some(32_400));
        assert_eq!(path.earliest_departure_time(33_000), Some(33_000));
        assert_eq!(path.earliest_departure_time(35_400), Some(35_400));
        assert_eq!(path.earliest_departure_time(35_401), None);
    }

    #[test]
    fn opening_hours_shift_arrival() {
        let path = AccessEgress::new(StopIndex(0), 300, 0)
            .unwrap()
            .with_opening_hours(32_400, 35_400)
            .unwrap();
        assert_eq!(path.latest_arrival_time(40_000), Some(35_700));
        assert_eq!(path.latest_arrival_time(33_000), Some(33_000));
        assert_eq!(path.latest_arrival_time(32_700), Some(32_700));
        assert_eq!(path.latest_arrival_time(32_699), None);
    }

    #[test]
    fn always_open_without_hours() {
        let path = AccessEgress::new(StopIndex(0), 300, 0).unwrap();
        assert_eq!(path.opening_hours(), None);
        assert_eq!(path.earliest_departure_time(-50), Some(-50));
        assert_eq!(path.latest_arrival_time(90_000), Some(90_000));
    }

    #[test]
    fn opening_hours_must_not_end_before_start() {
        let path = AccessEgress::new(StopIndex(0), 300, 0).unwrap();
        assert_eq!(
            path.with_opening_hours(600, 599),
            Err(DomainError::InvalidOpeningHours {
                open: 600,
                close: 599
            })
        );
    }

    #[test]
    fn time_penalty_applied_twice() {
        let path = AccessEgress::new(StopIndex(4), 100, 0)
            .unwrap()
            .with_time_penalty(60)
            .unwrap();
        assert_eq!(
            path.with_time_penalty(30),
            Err(SearchError::TimePenaltyAlreadyApplied(StopIndex(4)))
        );
    }
}
