//! Boarding, riding and alighting the trips of one pattern.

use crate::domain::{PatternIndex, StopIndex, TripRef};
use crate::paretoset::ParetoSet;
use crate::transit::{Route, TransferConstraintKind};

use super::{
    ArrivalKey, ArrivalKind, McRangeRaptorWorkerState, PatternRide, PatternRideComparator,
    SearchContext, StopArrival,
};

/// A trip found at a stop.
#[derive(Debug, Clone, Copy)]
struct Boarding {
    trip_index: usize,
    board_time: i32,
    constraint: Option<TransferConstraintKind>,
}

/// Multi-criteria routing of one pattern at a time.
///
/// Holds the riders of the pattern being scanned; they live from the stop
/// where they board until the end of the pattern.
pub struct MultiCriteriaRoutingStrategy<'a> {
    ctx: &'a SearchContext<'a>,
    rides: ParetoSet<PatternRide, PatternRideComparator>,
}

impl<'a> MultiCriteriaRoutingStrategy<'a> {
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self {
            ctx,
            rides: ParetoSet::new(PatternRideComparator::new(ctx.pass_through.is_enabled())),
        }
    }

    pub fn prepare_for_transit_with(&mut self) {
        self.rides.clear();
    }

    /// Riders pass `stop`; count it if it is their next pass-through point.
    pub fn pass_stop(&mut self, stop: StopIndex) {
        if !self.ctx.pass_through.is_enabled() {
            return;
        }
        for ride in self.rides.iter_mut() {
            ride.c2 = self.ctx.pass_through.update(ride.c2, stop);
        }
    }

    /// Every rider may get off at `stop`.
    pub fn alight(
        &self,
        state: &mut McRangeRaptorWorkerState<'a>,
        route: &Route,
        stop: StopIndex,
        stop_pos: usize,
        alight_slack: i32,
    ) {
        let calc = &self.ctx.calculator;
        for ride in self.rides.iter() {
            let trip = route.timetable.trip(ride.trip_sort_index());
            let alight_time = calc.alight_time(trip, stop_pos);
            state.transit_to_stop(ride, stop, stop_pos, alight_time, alight_slack);
        }
    }

    /// Board from every arrival at `stop` made in the previous round.
    pub fn board_all(
        &mut self,
        state: &mut McRangeRaptorWorkerState<'a>,
        pattern: PatternIndex,
        route: &Route,
        stop: StopIndex,
        stop_pos: usize,
        board_slack: i32,
    ) {
        for key in state.list_stop_arrivals_previous_round(stop) {
            self.board(state, pattern, route, stop, stop_pos, board_slack, key);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn board(
        &mut self,
        state: &mut McRangeRaptorWorkerState<'a>,
        pattern: PatternIndex,
        route: &Route,
        stop: StopIndex,
        stop_pos: usize,
        board_slack: i32,
        key: ArrivalKey,
    ) {
        let ctx = self.ctx;
        let calc = &ctx.calculator;
        let mut previous_id = key.id;
        let mut previous = *state.arrival(previous_id);

        let slack = if previous.arrived_by_access() {
            board_slack
        } else {
            board_slack + ctx.slack.transfer_slack()
        };
        let earliest_board_time = calc.plus(previous.arrival_time, slack);

        let Some(boarding) = self.find_boarding(
            state,
            pattern,
            route,
            stop,
            stop_pos,
            &previous,
            earliest_board_time,
        ) else {
            return;
        };

        if previous.arrived_by_access() {
            previous_id = state.time_shift_access(previous_id, boarding.board_time, board_slack);
            previous = *state.arrival(previous_id);
        }

        let trip = route.timetable.trip(boarding.trip_index);
        let reluctance_index = trip.transit_reluctance_index();
        let board_c1 = previous.c1
            + ctx.cost.boarding_cost(
                previous.round() == 0,
                previous.arrival_time,
                stop,
                boarding.board_time,
                reluctance_index,
                boarding.constraint,
            );
        let relative_c1 = board_c1
            + calc.on_trip_relative_riding_cost(
                boarding.board_time,
                ctx.cost.transit_factor(reluctance_index),
            );

        self.rides.add(PatternRide {
            previous_arrival: previous_id,
            board_stop: stop,
            board_pos: stop_pos,
            board_time: boarding.board_time,
            board_c1,
            relative_c1,
            trip: TripRef::new(pattern, boarding.trip_index),
            reluctance_index,
            c2: previous.c2,
            constraint: boarding.constraint,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn find_boarding(
        &self,
        state: &McRangeRaptorWorkerState<'a>,
        pattern: PatternIndex,
        route: &Route,
        stop: StopIndex,
        stop_pos: usize,
        previous: &StopArrival,
        earliest_board_time: i32,
    ) -> Option<Boarding> {
        let calc = &self.ctx.calculator;
        let timetable = &route.timetable;

        let constraints = self.constraints_for(state, pattern, stop, previous);
        if !constraints.is_empty() {
            return self.find_constrained_boarding(
                route,
                stop_pos,
                previous.arrival_time,
                earliest_board_time,
                &constraints,
            );
        }

        let trip_index = calc.find_trip(timetable, stop_pos, earliest_board_time)?;
        Some(Boarding {
            trip_index,
            board_time: calc.board_time(timetable.trip(trip_index), stop_pos),
            constraint: None,
        })
    }

    /// Constraints on transferring from the trip the traveller arrived with
    /// to trips of `pattern` at `stop`, as (trip index, kind).
    fn constraints_for(
        &self,
        state: &McRangeRaptorWorkerState<'a>,
        pattern: PatternIndex,
        stop: StopIndex,
        previous: &StopArrival,
    ) -> Vec<(usize, TransferConstraintKind)> {
        let ctx = self.ctx;
        let constrained = ctx.data.constrained_transfers();
        if !ctx.use_constrained_transfers || constrained.is_empty() {
            return Vec::new();
        }

        let transit = match previous.kind {
            ArrivalKind::Transit { .. } => Some(*previous),
            ArrivalKind::Transfer { .. } => previous
                .previous
                .map(|id| *state.arrival(id))
                .filter(StopArrival::arrived_by_transit),
            ArrivalKind::Access { .. } => None,
        };
        let Some(arrival) = transit else {
            return Vec::new();
        };
        let ArrivalKind::Transit { trip, .. } = arrival.kind else {
            return Vec::new();
        };

        if ctx.calculator.is_forward() {
            constrained
                .from_trip(trip, arrival.stop)
                .filter(|c| c.to_stop == stop && c.to_trip.pattern == pattern)
                .map(|c| (c.to_trip.trip, c.kind))
                .collect()
        } else {
            constrained
                .to_trip(trip, arrival.stop)
                .filter(|c| c.from_stop == stop && c.from_trip.pattern == pattern)
                .map(|c| (c.from_trip.trip, c.kind))
                .collect()
        }
    }

    /// Scan trips from the previous arrival time: facilitated connections
    /// board without slack, forbidden ones are skipped, anything else needs
    /// the regular slack.
    fn find_constrained_boarding(
        &self,
        route: &Route,
        stop_pos: usize,
        previous_arrival_time: i32,
        earliest_board_time: i32,
        constraints: &[(usize, TransferConstraintKind)],
    ) -> Option<Boarding> {
        let calc = &self.ctx.calculator;
        let timetable = &route.timetable;

        for trip_index in calc.trips_from(timetable, stop_pos, previous_arrival_time) {
            let board_time = calc.board_time(timetable.trip(trip_index), stop_pos);
            let kind = constraints
                .iter()
                .find(|(t, _)| *t == trip_index)
                .map(|&(_, kind)| kind);
            match kind {
                Some(kind) if kind.is_facilitated() => {
                    return Some(Boarding {
                        trip_index,
                        board_time,
                        constraint: Some(kind),
                    });
                }
                Some(_) => continue,
                None if !calc.is_before(board_time, earliest_board_time) => {
                    return Some(Boarding {
                        trip_index,
                        board_time,
                        constraint: None,
                    });
                }
                None => continue,
            }
        }
        None
    }
}
