//! Direction-aware time arithmetic.
//!
//! The search engine is written once, in forward terms: "board", "alight",
//! "earlier", "plus". A reverse search runs the same code with these
//! operations mirrored, walking patterns backwards and treating a real
//! alighting as its boarding.

use std::borrow::Cow;

use crate::domain::StopIndex;
use crate::transfer::{RaptorTransfer, RaptorTransferIndex};
use crate::transit::{Timetable, TripPattern, TripSchedule};

use super::{AccessEgress, SearchDirection};

#[derive(Debug, Clone)]
pub struct TransitCalculator {
    direction: SearchDirection,
    /// First iteration time in the search direction's "departure" sense:
    /// earliest departure (forward) or latest arrival (reverse).
    search_start: i32,
    search_window: i32,
    iteration_step: i32,
    time_limit: i32,
}

impl TransitCalculator {
    pub fn new(
        direction: SearchDirection,
        search_start: i32,
        search_window: i32,
        iteration_step: i32,
        time_limit: i32,
    ) -> Self {
        Self {
            direction,
            search_start,
            search_window,
            iteration_step: iteration_step.max(1),
            time_limit,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.direction.is_forward()
    }

    /// True if `a` is strictly better than `b` as an arrival time.
    pub fn is_before(&self, a: i32, b: i32) -> bool {
        if self.is_forward() { a < b } else { a > b }
    }

    /// Saturates, so an out-of-range result always exceeds the time limit.
    pub fn plus(&self, time: i32, delta: i32) -> i32 {
        if self.is_forward() {
            time.saturating_add(delta)
        } else {
            time.saturating_sub(delta)
        }
    }

    pub fn minus(&self, time: i32, delta: i32) -> i32 {
        if self.is_forward() {
            time.saturating_sub(delta)
        } else {
            time.saturating_add(delta)
        }
    }

    /// When an access or egress path can start, given the earliest time in
    /// search order: the earliest departure at or after `time` (forward) or
    /// the latest arrival at or before it (reverse). `None` if the path is
    /// closed.
    pub fn access_egress_start(&self, path: &AccessEgress, time: i32) -> Option<i32> {
        if self.is_forward() {
            path.earliest_departure_time(time)
        } else {
            path.latest_arrival_time(time)
        }
    }

    pub fn exceeds_time_limit(&self, time: i32) -> bool {
        self.is_before(self.time_limit, time)
    }

    /// Iteration start times, in the order they are searched.
    ///
    /// Forward searches go from the latest departure in the window to the
    /// earliest; reverse searches from the earliest arrival to the latest.
    /// A window narrower than one step gives a single iteration.
    pub fn range_raptor_minutes(&self) -> Vec<i32> {
        let step = self.iteration_step;
        let count = if self.search_window <= 0 {
            1
        } else {
            (self.search_window + step - 1) / step
        };
        (0..count)
            .rev()
            .map(|k| self.plus(self.search_start, k * step))
            .collect()
    }

    /// Stop positions of a pattern in search order.
    pub fn stop_positions(&self, number_of_stops: usize) -> StopPositions {
        if self.is_forward() {
            StopPositions {
                next: 0,
                end: number_of_stops as isize,
                step: 1,
            }
        } else {
            StopPositions {
                next: number_of_stops as isize - 1,
                end: -1,
                step: -1,
            }
        }
    }

    pub fn boarding_possible_at(&self, pattern: &TripPattern, stop_pos: usize) -> bool {
        if self.is_forward() {
            pattern.boarding_possible_at(stop_pos)
        } else {
            pattern.alighting_possible_at(stop_pos)
        }
    }

    pub fn alighting_possible_at(&self, pattern: &TripPattern, stop_pos: usize) -> bool {
        if self.is_forward() {
            pattern.alighting_possible_at(stop_pos)
        } else {
            pattern.boarding_possible_at(stop_pos)
        }
    }

    /// Time a rider boarding (in search terms) at `stop_pos` leaves the stop.
    pub fn board_time(&self, trip: &TripSchedule, stop_pos: usize) -> i32 {
        if self.is_forward() {
            trip.departure(stop_pos)
        } else {
            trip.arrival(stop_pos)
        }
    }

    /// Time a rider alighting (in search terms) at `stop_pos` reaches the stop.
    pub fn alight_time(&self, trip: &TripSchedule, stop_pos: usize) -> i32 {
        if self.is_forward() {
            trip.arrival(stop_pos)
        } else {
            trip.departure(stop_pos)
        }
    }

    /// The first trip that can be boarded at `stop_pos` no earlier than
    /// `earliest_board_time` in search order.
    pub fn find_trip(
        &self,
        timetable: &Timetable,
        stop_pos: usize,
        earliest_board_time: i32,
    ) -> Option<usize> {
        if self.is_forward() {
            timetable.earliest_departure_at_or_after(stop_pos, earliest_board_time)
        } else {
            timetable.latest_arrival_at_or_before(stop_pos, earliest_board_time)
        }
    }

    /// Trips at `stop_pos` in search order, starting with the first that
    /// boards no earlier than `earliest_board_time`.
    pub fn trips_from(
        &self,
        timetable: &Timetable,
        stop_pos: usize,
        earliest_board_time: i32,
    ) -> Box<dyn Iterator<Item = usize>> {
        match self.find_trip(timetable, stop_pos, earliest_board_time) {
            None => Box::new(std::iter::empty()),
            Some(first) if self.is_forward() => Box::new(first..timetable.len()),
            Some(first) => Box::new((0..=first).rev()),
        }
    }

    /// Transfers to relax from `stop`.
    pub fn transfers<'a>(
        &self,
        index: &'a dyn RaptorTransferIndex,
        stop: StopIndex,
    ) -> Cow<'a, [RaptorTransfer]> {
        if self.is_forward() {
            index.forward_transfers(stop)
        } else {
            index.reversed_transfers(stop)
        }
    }

    /// Part of the riding cost that differs between riders of one trip:
    /// only the board time differs, so only it is priced.
    pub fn on_trip_relative_riding_cost(&self, board_time: i32, transit_factor: i32) -> i32 {
        if self.is_forward() {
            -board_time * transit_factor
        } else {
            board_time * transit_factor
        }
    }
}

/// Iterator over a pattern's stop positions in search order.
#[derive(Debug, Clone)]
pub struct StopPositions {
    next: isize,
    end: isize,
    step: isize,
}

impl Iterator for StopPositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next == self.end {
            return None;
        }
        let pos = self.next as usize;
        self.next += self.step;
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> TransitCalculator {
        TransitCalculator::new(SearchDirection::Forward, 1000, 300, 60, 5000)
    }

    fn reverse() -> TransitCalculator {
        TransitCalculator::new(SearchDirection::Reverse, 5000, 300, 60, 1000)
    }

    #[test]
    fn time_arithmetic() {
        let f = forward();
        assert!(f.is_before(10, 20));
        assert_eq!(f.plus(100, 30), 130);
        assert_eq!(f.minus(100, 30), 70);
        assert!(f.exceeds_time_limit(5001));
        assert!(!f.exceeds_time_limit(5000));

        let r = reverse();
        assert!(r.is_before(20, 10));
        assert_eq!(r.plus(100, 30), 70);
        assert_eq!(r.minus(100, 30), 130);
        assert!(r.exceeds_time_limit(999));
        assert!(!r.exceeds_time_limit(1000));
    }

    #[test]
    fn overflowing_times_saturate_past_the_limit() {
        let f = forward();
        assert_eq!(f.plus(600, i32::MAX), i32::MAX);
        assert!(f.exceeds_time_limit(f.plus(600, i32::MAX)));

        let r = reverse();
        assert_eq!(r.plus(600, i32::MAX), i32::MIN + 601);
        assert!(r.exceeds_time_limit(r.plus(600, i32::MAX)));
        assert_eq!(r.minus(600, i32::MAX), i32::MAX);
    }

    #[test]
    fn access_egress_start_follows_direction() {
        let path = AccessEgress::new(StopIndex(0), 100, 0)
            .unwrap()
            .with_opening_hours(2000, 3000)
            .unwrap();
        assert_eq!(forward().access_egress_start(&path, 1000), Some(2000));
        assert_eq!(forward().access_egress_start(&path, 3500), None);
        assert_eq!(reverse().access_egress_start(&path, 5000), Some(3100));
        assert_eq!(reverse().access_egress_start(&path, 2000), None);
    }

    #[test]
    fn iteration_minutes() {
        assert_eq!(forward().range_raptor_minutes(), vec![1240, 1180, 1120, 1060, 1000]);
        assert_eq!(reverse().range_raptor_minutes(), vec![4760, 4820, 4880, 4940, 5000]);

        let single = TransitCalculator::new(SearchDirection::Forward, 1000, 0, 60, 5000);
        assert_eq!(single.range_raptor_minutes(), vec![1000]);

        let narrow = TransitCalculator::new(SearchDirection::Forward, 1000, 30, 60, 5000);
        assert_eq!(narrow.range_raptor_minutes(), vec![1000]);
    }

    #[test]
    fn stop_position_order() {
        assert_eq!(forward().stop_positions(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(reverse().stop_positions(3).collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(reverse().stop_positions(0).count(), 0);
    }

    #[test]
    fn relative_riding_cost() {
        // a later board time means less time spent on board so far
        let f = forward();
        assert!(f.on_trip_relative_riding_cost(200, 100) < f.on_trip_relative_riding_cost(100, 100));
        assert_eq!(reverse().on_trip_relative_riding_cost(200, 100), 20_000);
    }
}
