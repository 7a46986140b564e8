//! Trip schedules and frequency-based trips.

use super::ScheduleError;

/// Stop times of one trip, indexed by stop position in its pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSchedule {
    id: String,
    arrivals: Vec<i32>,
    departures: Vec<i32>,
    transit_reluctance_index: usize,
}

impl TripSchedule {
    /// Create a trip from arrival and departure times.
    ///
    /// Times must never decrease along the trip: each departure is at or after
    /// the arrival at the same position, and each arrival is at or after the
    /// departure from the previous position.
    pub fn new(
        id: impl Into<String>,
        arrivals: Vec<i32>,
        departures: Vec<i32>,
    ) -> Result<Self, ScheduleError> {
        let id = id.into();
        if arrivals.len() != departures.len() {
            return Err(ScheduleError::WrongNumberOfStopTimes {
                trip: id,
                expected: arrivals.len(),
                actual: departures.len(),
            });
        }

        for pos in 0..arrivals.len() {
            let dwell_ok = departures[pos] >= arrivals[pos];
            let hop_ok = pos == 0 || arrivals[pos] >= departures[pos - 1];
            if !dwell_ok || !hop_ok {
                return Err(ScheduleError::DecreasingStopTimes {
                    trip: id,
                    position: pos,
                });
            }
        }

        Ok(Self {
            id,
            arrivals,
            departures,
            transit_reluctance_index: 0,
        })
    }

    /// Create a trip where arrival and departure coincide at every stop.
    pub fn from_times(id: impl Into<String>, times: Vec<i32>) -> Result<Self, ScheduleError> {
        Self::new(id, times.clone(), times)
    }

    /// Select which transit reluctance factor applies to this trip.
    pub fn with_transit_reluctance_index(mut self, index: usize) -> Self {
        self.transit_reluctance_index = index;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arrival(&self, stop_pos: usize) -> i32 {
        self.arrivals[stop_pos]
    }

    pub fn departure(&self, stop_pos: usize) -> i32 {
        self.departures[stop_pos]
    }

    pub fn number_of_stops(&self) -> usize {
        self.arrivals.len()
    }

    pub fn transit_reluctance_index(&self) -> usize {
        self.transit_reluctance_index
    }

    fn shifted(&self, id: String, offset: i32) -> Self {
        Self {
            id,
            arrivals: self.arrivals.iter().map(|t| t + offset).collect(),
            departures: self.departures.iter().map(|t| t + offset).collect(),
            transit_reluctance_index: self.transit_reluctance_index,
        }
    }
}

/// A trip repeated at a fixed headway.
///
/// The template holds the stop times of one run; its first departure is
/// moved to every start time in `[start_time, end_time)` spaced by `headway`.
#[derive(Debug, Clone)]
pub struct FrequencyEntry {
    pub template: TripSchedule,
    pub start_time: i32,
    pub end_time: i32,
    pub headway: i32,
}

impl FrequencyEntry {
    /// Expand the entry into scheduled trips, named `<template id>@<n>`.
    pub fn expand(&self) -> Result<Vec<TripSchedule>, ScheduleError> {
        let invalid = |reason| ScheduleError::InvalidFrequency {
            trip: self.template.id.clone(),
            reason,
        };
        if self.headway <= 0 {
            return Err(invalid("headway must be positive"));
        }
        if self.end_time < self.start_time {
            return Err(invalid("end time before start time"));
        }
        if self.template.number_of_stops() == 0 {
            return Err(invalid("template trip has no stop times"));
        }

        let first_departure = self.template.departure(0);
        let trips = (self.start_time..self.end_time)
            .step_by(self.headway as usize)
            .enumerate()
            .map(|(n, start)| {
                self.template
                    .shifted(format!("{}@{n}", self.template.id), start - first_departure)
            })
            .collect();
        Ok(trips)
    }
}
