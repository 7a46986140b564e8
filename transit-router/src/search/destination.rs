//! Joining stop arrivals with egress paths.

use tracing::trace;

use crate::domain::StopIndex;
use crate::paretoset::{ParetoComparator, ParetoSet};

use super::{ArrivalId, SearchContext, StopArrival};

/// Egress paths grouped by the stop they start from (search direction).
#[derive(Debug, Clone)]
pub struct EgressPaths {
    by_stop: Vec<Vec<usize>>,
}

impl EgressPaths {
    pub fn new(ctx: &SearchContext<'_>) -> Self {
        let mut by_stop = vec![Vec::new(); ctx.data.number_of_stops()];
        for (i, egress) in ctx.egress.iter().enumerate() {
            by_stop[egress.stop().index()].push(i);
        }
        Self { by_stop }
    }

    pub fn is_egress_stop(&self, stop: StopIndex) -> bool {
        !self.by_stop[stop.index()].is_empty()
    }

    /// Egress paths an arrival may continue with.
    ///
    /// After riding, any egress will do. After walking, only egress paths
    /// that start by boarding a vehicle, so two street legs never follow
    /// each other.
    pub fn usable_after<'s>(
        &'s self,
        ctx: &'s SearchContext<'_>,
        stop: StopIndex,
        on_board: bool,
    ) -> impl Iterator<Item = usize> + 's {
        self.by_stop[stop.index()]
            .iter()
            .copied()
            .filter(move |&i| on_board || ctx.egress[i].stop_reached_on_board())
    }
}

/// A complete path candidate, before it is mapped into legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationArrival {
    /// Last stop arrival before the egress.
    pub arrival: ArrivalId,
    /// Index into the search's egress list.
    pub egress: usize,
    /// Time leaving the last stop, in search terms.
    pub departure_time: i32,
    /// Time reaching the end of the search, in search terms.
    pub arrival_time: i32,
    /// Departure from the origin, in real time.
    pub start_time: i32,
    /// Arrival at the destination, in real time.
    pub end_time: i32,
    pub number_of_transfers: u32,
    pub c1: i32,
    pub c2: i32,
}

/// Dominance between complete paths: earlier arrival, later departure,
/// fewer transfers, lower cost and (with pass-through points) higher c2.
#[derive(Debug, Clone, Copy)]
pub struct DestinationComparator {
    include_c2: bool,
}

impl ParetoComparator<DestinationArrival> for DestinationComparator {
    fn left_dominance_exist(&self, left: &DestinationArrival, right: &DestinationArrival) -> bool {
        left.end_time < right.end_time
            || left.start_time > right.start_time
            || left.number_of_transfers < right.number_of_transfers
            || left.c1 < right.c1
            || (self.include_c2 && left.c2 > right.c2)
    }
}

/// The Pareto set of complete paths found so far.
pub struct DestinationArrivalPaths {
    paths: ParetoSet<DestinationArrival, DestinationComparator>,
    reached_in_current_round: bool,
}

impl DestinationArrivalPaths {
    pub fn new(include_c2: bool) -> Self {
        Self {
            paths: ParetoSet::new(DestinationComparator { include_c2 }),
            reached_in_current_round: false,
        }
    }

    /// Offer the path ending with `egress` after `arrival`.
    pub fn add(
        &mut self,
        ctx: &SearchContext<'_>,
        id: ArrivalId,
        arrival: &StopArrival,
        egress_index: usize,
    ) {
        let calc = &ctx.calculator;
        let egress = &ctx.egress[egress_index];

        let ready_time = if egress.has_rides() {
            calc.plus(arrival.arrival_time, ctx.slack.transfer_slack())
        } else {
            arrival.arrival_time
        };
        let Some(departure_time) = calc.access_egress_start(egress, ready_time) else {
            trace!(stop = %arrival.stop, ready_time, "egress closed");
            return;
        };
        let arrival_time = calc.plus(departure_time, egress.duration());
        if calc.exceeds_time_limit(arrival_time) {
            trace!(stop = %arrival.stop, arrival_time, "destination arrival exceeds time limit");
            return;
        }
        if !ctx.pass_through.is_satisfied(arrival.c2) {
            trace!(stop = %arrival.stop, c2 = arrival.c2, "pass-through points not visited");
            return;
        }

        let wait_time = (departure_time - arrival.arrival_time).abs();
        let c1 = arrival
            .c1
            .saturating_add(ctx.cost.wait_cost(wait_time))
            .saturating_add(ctx.cost.cost_egress(egress));
        let rounds = arrival.round() + egress.number_of_rides();
        let (start_time, end_time) = if calc.is_forward() {
            (arrival.origin_time, arrival_time)
        } else {
            (arrival_time, arrival.origin_time)
        };

        let candidate = DestinationArrival {
            arrival: id,
            egress: egress_index,
            departure_time,
            arrival_time,
            start_time,
            end_time,
            number_of_transfers: rounds.saturating_sub(1),
            c1,
            c2: arrival.c2,
        };
        if self.paths.add(candidate).is_accepted() {
            trace!(start_time, end_time, c1, rounds, "new destination arrival");
            self.reached_in_current_round = true;
        }
    }

    pub fn is_reached_in_current_round(&self) -> bool {
        self.reached_in_current_round
    }

    pub fn clear_reached_in_current_round(&mut self) {
        self.reached_in_current_round = false;
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationArrival> {
        self.paths.iter()
    }
}
