//! Riders on board a trip of the pattern being scanned.

use crate::domain::{StopIndex, TripRef};
use crate::paretoset::ParetoComparator;
use crate::transit::TransferConstraintKind;

use super::ArrivalId;

/// A rider who boarded a trip and has not alighted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRide {
    pub previous_arrival: ArrivalId,
    pub board_stop: StopIndex,
    pub board_pos: usize,
    pub board_time: i32,
    /// Cost at the moment of boarding, including the boarding cost.
    pub board_c1: i32,
    /// `board_c1` adjusted by the riding cost that differs between riders
    /// of the same trip; used only to compare rides.
    pub relative_c1: i32,
    pub trip: TripRef,
    pub reluctance_index: usize,
    pub c2: i32,
    pub constraint: Option<TransferConstraintKind>,
}

impl PatternRide {
    /// Index of the trip within its pattern's timetable.
    pub fn trip_sort_index(&self) -> usize {
        self.trip.trip
    }
}

/// Rides on different trips never dominate each other. On the same trip
/// the lower relative cost wins, and with pass-through points the higher
/// c2 too.
///
/// Assumes riding costs accrue identically for every rider of one trip.
#[derive(Debug, Clone, Copy)]
pub struct PatternRideComparator {
    include_c2: bool,
}

impl PatternRideComparator {
    pub fn new(include_c2: bool) -> Self {
        Self { include_c2 }
    }
}

impl ParetoComparator<PatternRide> for PatternRideComparator {
    fn left_dominance_exist(&self, left: &PatternRide, right: &PatternRide) -> bool {
        left.trip_sort_index() != right.trip_sort_index()
            || left.relative_c1 < right.relative_c1
            || (self.include_c2 && left.c2 > right.c2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatternIndex;
    use crate::paretoset::{AddOutcome, ParetoSet};
    use crate::search::ArrivalArena;
    use crate::search::arrival::{ArrivalKind, StopArrival};

    fn ride(trip: usize, relative_c1: i32, c2: i32) -> PatternRide {
        let mut arena = ArrivalArena::new();
        let id = arena.push(StopArrival {
            stop: StopIndex(0),
            arrival_time: 0,
            c1: 0,
            c2: 0,
            pareto_round: 0,
            origin_time: 0,
            previous: None,
            kind: ArrivalKind::Access { path: 0 },
        });
        PatternRide {
            previous_arrival: id,
            board_stop: StopIndex(0),
            board_pos: 0,
            board_time: 0,
            board_c1: relative_c1,
            relative_c1,
            trip: TripRef::new(PatternIndex(0), trip),
            reluctance_index: 0,
            c2,
            constraint: None,
        }
    }

    #[test]
    fn same_trip_lower_cost_wins() {
        let cmp = PatternRideComparator::new(false);
        assert!(cmp.left_dominance_exist(&ride(1, 100, 0), &ride(1, 200, 0)));
        assert!(!cmp.left_dominance_exist(&ride(1, 200, 0), &ride(1, 100, 0)));
    }

    #[test]
    fn cheaper_rider_replaces_earlier_one() {
        let mut set = ParetoSet::new(PatternRideComparator::new(false));
        assert!(set.add(ride(1, 200, 0)).is_accepted());
        assert!(set.add(ride(2, 300, 0)).is_accepted());

        assert_eq!(set.add(ride(1, 100, 0)), AddOutcome::Accepted { dropped: 1 });
        let mut left: Vec<_> = set.iter().map(|r| (r.trip_sort_index(), r.relative_c1)).collect();
        left.sort();
        assert_eq!(left, vec![(1, 100), (2, 300)]);
    }

    #[test]
    fn different_trips_both_survive() {
        let mut set = ParetoSet::new(PatternRideComparator::new(false));
        assert!(set.add(ride(1, 200, 0)).is_accepted());
        assert!(set.add(ride(2, 100, 0)).is_accepted());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn equal_rides_keep_first() {
        let mut set = ParetoSet::new(PatternRideComparator::new(false));
        assert!(set.add(ride(1, 100, 0)).is_accepted());
        assert!(!set.add(ride(1, 100, 0)).is_accepted());
        assert!(!set.add(ride(1, 150, 0)).is_accepted());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn c2_counts_only_with_pass_through() {
        let cmp = PatternRideComparator::new(true);
        assert!(cmp.left_dominance_exist(&ride(1, 200, 1), &ride(1, 100, 0)));
        assert!(cmp.left_dominance_exist(&ride(1, 100, 0), &ride(1, 200, 1)));

        let cmp = PatternRideComparator::new(false);
        assert!(!cmp.left_dominance_exist(&ride(1, 200, 1), &ride(1, 100, 0)));
    }
}
