//! The per-day schedule the search reads from.

use chrono::NaiveDate;

use crate::domain::{PatternIndex, StopIndex, TripRef};

use super::{
    ConstrainedTransfer, ConstrainedTransfers, FrequencyEntry, ScheduleError, Timetable,
    TripPattern, TripSchedule,
};

/// A pattern together with its timetable.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: TripPattern,
    pub timetable: Timetable,
}

/// Patterns, trips and constrained transfers active on one service date.
///
/// Immutable once built and shared between searches.
#[derive(Debug, Clone)]
pub struct TransitData {
    service_date: NaiveDate,
    stop_names: Vec<String>,
    routes: Vec<Route>,
    routes_by_stop: Vec<Vec<PatternIndex>>,
    constrained_transfers: ConstrainedTransfers,
}

impl TransitData {
    pub fn builder(service_date: NaiveDate) -> TransitDataBuilder {
        TransitDataBuilder {
            service_date,
            stop_names: Vec::new(),
            routes: Vec::new(),
            constrained_transfers: Vec::new(),
        }
    }

    pub fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    pub fn number_of_stops(&self) -> usize {
        self.stop_names.len()
    }

    pub fn stop_name(&self, stop: StopIndex) -> &str {
        &self.stop_names[stop.index()]
    }

    /// Look up a stop by name.
    pub fn find_stop(&self, name: &str) -> Option<StopIndex> {
        self.stop_names
            .iter()
            .position(|n| n == name)
            .map(StopIndex)
    }

    pub fn route(&self, pattern: PatternIndex) -> &Route {
        &self.routes[pattern.index()]
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn trip(&self, trip: TripRef) -> &TripSchedule {
        self.route(trip.pattern).timetable.trip(trip.trip)
    }

    pub fn constrained_transfers(&self) -> &ConstrainedTransfers {
        &self.constrained_transfers
    }

    /// Patterns serving any of the given stops, in ascending pattern order
    /// and without duplicates.
    pub fn routes_touched_by(&self, stops: &[StopIndex]) -> Vec<PatternIndex> {
        let mut touched = vec![false; self.routes.len()];
        for stop in stops {
            for pattern in &self.routes_by_stop[stop.index()] {
                touched[pattern.index()] = true;
            }
        }
        touched
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t)
            .map(|(i, _)| PatternIndex(i))
            .collect()
    }
}

/// Incrementally assembles a [`TransitData`].
#[derive(Debug)]
pub struct TransitDataBuilder {
    service_date: NaiveDate,
    stop_names: Vec<String>,
    routes: Vec<Route>,
    constrained_transfers: Vec<ConstrainedTransfer>,
}

impl TransitDataBuilder {
    pub fn add_stop(&mut self, name: impl Into<String>) -> StopIndex {
        self.stop_names.push(name.into());
        StopIndex(self.stop_names.len() - 1)
    }

    /// Add a pattern with its scheduled trips and frequency entries.
    pub fn add_route(
        &mut self,
        pattern: TripPattern,
        trips: Vec<TripSchedule>,
        frequencies: &[FrequencyEntry],
    ) -> Result<PatternIndex, ScheduleError> {
        if let Some(&stop) = pattern
            .stops()
            .iter()
            .find(|s| s.index() >= self.stop_names.len())
        {
            return Err(ScheduleError::UnknownStop {
                pattern: pattern.name().to_string(),
                stop,
            });
        }
        let timetable = Timetable::new(&pattern, trips, frequencies)?;
        self.routes.push(Route { pattern, timetable });
        Ok(PatternIndex(self.routes.len() - 1))
    }

    /// Add a constrained transfer; both trips must already exist.
    pub fn add_constrained_transfer(
        &mut self,
        transfer: ConstrainedTransfer,
    ) -> Result<(), ScheduleError> {
        for trip in [transfer.from_trip, transfer.to_trip] {
            let known = self
                .routes
                .get(trip.pattern.index())
                .is_some_and(|r| trip.trip < r.timetable.len());
            if !known {
                return Err(ScheduleError::UnknownTrip {
                    pattern: trip.pattern,
                    trip: trip.trip,
                });
            }
        }
        self.constrained_transfers.push(transfer);
        Ok(())
    }

    /// Position of the trip with id `trip_id` in a pattern's sorted
    /// timetable.
    pub fn trip_index(&self, pattern: PatternIndex, trip_id: &str) -> Option<usize> {
        self.routes
            .get(pattern.index())?
            .timetable
            .trips()
            .iter()
            .position(|t| t.id() == trip_id)
    }

    pub fn build(self) -> TransitData {
        let mut routes_by_stop = vec![Vec::new(); self.stop_names.len()];
        for (i, route) in self.routes.iter().enumerate() {
            for stop in route.pattern.stops() {
                let patterns: &mut Vec<PatternIndex> = &mut routes_by_stop[stop.index()];
                if patterns.last() != Some(&PatternIndex(i)) {
                    patterns.push(PatternIndex(i));
                }
            }
        }

        TransitData {
            service_date: self.service_date,
            stop_names: self.stop_names,
            routes: self.routes,
            routes_by_stop,
            constrained_transfers: ConstrainedTransfers::new(self.constrained_transfers),
        }
    }
}
