//! Trip patterns and their timetables.

use crate::domain::StopIndex;

use super::{FrequencyEntry, ScheduleError, TripSchedule};

/// An ordered stop sequence shared by a set of trips.
#[derive(Debug, Clone)]
pub struct TripPattern {
    name: String,
    stops: Vec<StopIndex>,
    board_allowed: Vec<bool>,
    alight_allowed: Vec<bool>,
    slack_index: usize,
}

impl TripPattern {
    /// Create a pattern where boarding and alighting are allowed everywhere.
    pub fn new(name: impl Into<String>, stops: Vec<StopIndex>) -> Result<Self, ScheduleError> {
        let name = name.into();
        if stops.len() < 2 {
            return Err(ScheduleError::TooFewStops(name));
        }
        let n = stops.len();
        Ok(Self {
            name,
            stops,
            board_allowed: vec![true; n],
            alight_allowed: vec![true; n],
            slack_index: 0,
        })
    }

    /// Forbid boarding at the given stop position.
    pub fn no_boarding_at(mut self, stop_pos: usize) -> Self {
        if let Some(allowed) = self.board_allowed.get_mut(stop_pos) {
            *allowed = false;
        }
        self
    }

    /// Forbid alighting at the given stop position.
    pub fn no_alighting_at(mut self, stop_pos: usize) -> Self {
        if let Some(allowed) = self.alight_allowed.get_mut(stop_pos) {
            *allowed = false;
        }
        self
    }

    /// Select the board/alight slack used for this pattern.
    pub fn with_slack_index(mut self, slack_index: usize) -> Self {
        self.slack_index = slack_index;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(&self, stop_pos: usize) -> StopIndex {
        self.stops[stop_pos]
    }

    pub fn stops(&self) -> &[StopIndex] {
        &self.stops
    }

    pub fn number_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn boarding_possible_at(&self, stop_pos: usize) -> bool {
        self.board_allowed[stop_pos]
    }

    pub fn alighting_possible_at(&self, stop_pos: usize) -> bool {
        self.alight_allowed[stop_pos]
    }

    pub fn slack_index(&self) -> usize {
        self.slack_index
    }
}

/// The trips of one pattern, sorted by departure.
///
/// Trips never overtake each other, so sorting by the first departure sorts
/// every stop position at once and both trip searches can binary search.
#[derive(Debug, Clone)]
pub struct Timetable {
    trips: Vec<TripSchedule>,
}

impl Timetable {
    /// Build a timetable from scheduled trips and frequency entries.
    pub fn new(
        pattern: &TripPattern,
        mut trips: Vec<TripSchedule>,
        frequencies: &[FrequencyEntry],
    ) -> Result<Self, ScheduleError> {
        for entry in frequencies {
            trips.extend(entry.expand()?);
        }

        for trip in &trips {
            if trip.number_of_stops() != pattern.number_of_stops() {
                return Err(ScheduleError::WrongNumberOfStopTimes {
                    trip: trip.id().to_string(),
                    expected: pattern.number_of_stops(),
                    actual: trip.number_of_stops(),
                });
            }
        }

        trips.sort_by_key(|t| (t.departure(0), t.arrival(t.number_of_stops() - 1)));

        for pair in trips.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let overtaken = (0..pattern.number_of_stops())
                .find(|&pos| b.arrival(pos) < a.arrival(pos) || b.departure(pos) < a.departure(pos));
            if let Some(position) = overtaken {
                return Err(ScheduleError::OvertakingTrips {
                    first: a.id().to_string(),
                    second: b.id().to_string(),
                    position,
                });
            }
        }

        Ok(Self { trips })
    }

    pub fn trip(&self, trip_index: usize) -> &TripSchedule {
        &self.trips[trip_index]
    }

    pub fn trips(&self) -> &[TripSchedule] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Index of the first trip departing `stop_pos` at or after `time`.
    pub fn earliest_departure_at_or_after(&self, stop_pos: usize, time: i32) -> Option<usize> {
        let index = self
            .trips
            .partition_point(|trip| trip.departure(stop_pos) < time);
        (index < self.trips.len()).then_some(index)
    }

    /// Index of the last trip arriving at `stop_pos` at or before `time`.
    pub fn latest_arrival_at_or_before(&self, stop_pos: usize, time: i32) -> Option<usize> {
        self.trips
            .partition_point(|trip| trip.arrival(stop_pos) <= time)
            .checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> TripPattern {
        TripPattern::new("R1", vec![StopIndex(0), StopIndex(1), StopIndex(2)]).unwrap()
    }

    fn trip(id: &str, times: [i32; 3]) -> TripSchedule {
        TripSchedule::from_times(id, times.to_vec()).unwrap()
    }

    #[test]
    fn pattern_needs_two_stops() {
        let err = TripPattern::new("R1", vec![StopIndex(0)]).unwrap_err();
        assert_eq!(err, ScheduleError::TooFewStops("R1".into()));
    }

    #[test]
    fn board_and_alight_restrictions() {
        let p = pattern().no_boarding_at(2).no_alighting_at(0);
        assert!(p.boarding_possible_at(0));
        assert!(!p.boarding_possible_at(2));
        assert!(!p.alighting_possible_at(0));
        assert!(p.alighting_possible_at(2));
    }

    #[test]
    fn trips_are_sorted() {
        let tt = Timetable::new(
            &pattern(),
            vec![trip("late", [600, 700, 800]), trip("early", [0, 100, 200])],
            &[],
        )
        .unwrap();
        assert_eq!(tt.trip(0).id(), "early");
        assert_eq!(tt.trip(1).id(), "late");
    }

    #[test]
    fn overtaking_is_rejected() {
        let err = Timetable::new(
            &pattern(),
            vec![trip("slow", [0, 500, 1000]), trip("fast", [100, 200, 300])],
            &[],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OvertakingTrips {
                first: "slow".into(),
                second: "fast".into(),
                position: 1
            }
        );
    }

    #[test]
    fn wrong_stop_count_is_rejected() {
        let short = TripSchedule::from_times("short", vec![0, 100]).unwrap();
        let err = Timetable::new(&pattern(), vec![short], &[]).unwrap_err();
        assert!(matches!(err, ScheduleError::WrongNumberOfStopTimes { .. }));
    }

    #[test]
    fn frequencies_are_merged_with_trips() {
        let entry = FrequencyEntry {
            template: trip("f", [0, 100, 200]),
            start_time: 1000,
            end_time: 2000,
            headway: 500,
        };
        let tt = Timetable::new(&pattern(), vec![trip("s", [1200, 1300, 1400])], &[entry]).unwrap();
        let ids: Vec<&str> = tt.trips().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["f@0", "s", "f@1"]);
    }

    #[test]
    fn trip_searches() {
        let tt = Timetable::new(
            &pattern(),
            vec![trip("a", [0, 100, 200]), trip("b", [600, 700, 800])],
            &[],
        )
        .unwrap();

        assert_eq!(tt.earliest_departure_at_or_after(1, 0), Some(0));
        assert_eq!(tt.earliest_departure_at_or_after(1, 100), Some(0));
        assert_eq!(tt.earliest_departure_at_or_after(1, 101), Some(1));
        assert_eq!(tt.earliest_departure_at_or_after(1, 701), None);

        assert_eq!(tt.latest_arrival_at_or_before(2, 199), None);
        assert_eq!(tt.latest_arrival_at_or_before(2, 200), Some(0));
        assert_eq!(tt.latest_arrival_at_or_before(2, 799), Some(0));
        assert_eq!(tt.latest_arrival_at_or_before(2, 5000), Some(1));
    }
}
