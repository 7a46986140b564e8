//! Mutable state of one multi-criteria Range-RAPTOR search.

use tracing::trace;

use crate::domain::StopIndex;

use super::{
    ArrivalArena, ArrivalId, ArrivalKey, ArrivalKind, DestinationArrival, McStopArrivals,
    PatternRide, SearchContext, StopArrival,
};

/// Arrivals found so far, plus the arrivals of the running phase.
///
/// New transit and transfer arrivals are cached and only committed to the
/// stop sets when their phase completes, so a phase never sees its own
/// results.
pub struct McRangeRaptorWorkerState<'a> {
    ctx: &'a SearchContext<'a>,
    arena: ArrivalArena,
    arrivals: McStopArrivals,
    cache: Vec<ArrivalId>,
}

impl<'a> McRangeRaptorWorkerState<'a> {
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self {
            ctx,
            arena: ArrivalArena::new(),
            arrivals: McStopArrivals::new(ctx),
            cache: Vec::new(),
        }
    }

    pub fn setup_iteration(&mut self) {
        self.cache.clear();
        self.arrivals.clear_touched_stops_and_set_stop_markers();
    }

    pub fn prepare_for_next_round(&mut self) {
        self.arrivals.destination_mut().clear_reached_in_current_round();
    }

    pub fn arrival(&self, id: ArrivalId) -> &StopArrival {
        self.arena.get(id)
    }

    /// Stops reached in the previous round (or by access this iteration).
    pub fn stops_touched_previous_round(&self) -> Vec<StopIndex> {
        self.arrivals.touched_stops().to_vec()
    }

    /// Stops reached by transit in the current round; only valid between
    /// the transit and transfer phases.
    pub fn stops_touched_by_transit_current_round(&self) -> Vec<StopIndex> {
        self.arrivals.touched_stops().to_vec()
    }

    pub fn list_stop_arrivals_previous_round(&self, stop: StopIndex) -> Vec<ArrivalKey> {
        self.arrivals.arrivals_after_marker(stop).to_vec()
    }

    pub fn is_new_round_available(&self) -> bool {
        self.arrivals.is_new_round_available()
    }

    pub fn is_destination_reached_in_current_round(&self) -> bool {
        self.arrivals.destination().is_reached_in_current_round()
    }

    /// Add the arrival of an access path started at `iteration_time`, or
    /// at its opening time if that is later.
    pub fn add_access_arrival(&mut self, iteration_time: i32, path: usize) {
        let ctx = self.ctx;
        let access = &ctx.access[path];
        let Some(departure_time) = ctx.calculator.access_egress_start(access, iteration_time)
        else {
            return;
        };
        let arrival_time = ctx.calculator.plus(departure_time, access.duration());
        if ctx.calculator.exceeds_time_limit(arrival_time) {
            return;
        }

        let rides = access.number_of_rides();
        let pareto_round = match (rides, access.stop_reached_on_board()) {
            (0, _) => 0,
            (n, true) => 2 * n - 1,
            (n, false) => 2 * n,
        };
        let id = self.arena.push(StopArrival {
            stop: access.stop(),
            arrival_time,
            c1: access.c1(),
            c2: ctx.pass_through.update(0, access.stop()),
            pareto_round,
            origin_time: departure_time,
            previous: None,
            kind: ArrivalKind::Access { path },
        });
        self.arrivals.add_stop_arrival(ctx, &self.arena, id);
    }

    /// Move a walking access arrival forward in time so it ends `board_slack`
    /// before `board_time`, removing the wait at the first stop. The shifted
    /// access must still start within its opening hours.
    pub fn time_shift_access(
        &mut self,
        id: ArrivalId,
        board_time: i32,
        board_slack: i32,
    ) -> ArrivalId {
        let arrival = *self.arena.get(id);
        let shifted_time = self.ctx.calculator.minus(board_time, board_slack);
        let ArrivalKind::Access { path } = arrival.kind else {
            return id;
        };
        if arrival.pareto_round != 0 || shifted_time == arrival.arrival_time {
            return id;
        }
        let shift = shifted_time - arrival.arrival_time;
        let origin_time = arrival.origin_time + shift;
        let access = &self.ctx.access[path];
        if self.ctx.calculator.access_egress_start(access, origin_time) != Some(origin_time) {
            return id;
        }
        self.arena.push(StopArrival {
            arrival_time: shifted_time,
            origin_time,
            ..arrival
        })
    }

    /// Alight a ride at `stop` and cache the transit arrival.
    pub fn transit_to_stop(
        &mut self,
        ride: &PatternRide,
        stop: StopIndex,
        alight_pos: usize,
        alight_time: i32,
        alight_slack: i32,
    ) {
        let ctx = self.ctx;
        let arrival_time = ctx.calculator.plus(alight_time, alight_slack);
        if ctx.calculator.exceeds_time_limit(arrival_time) {
            return;
        }

        let previous = *self.arena.get(ride.previous_arrival);
        let transit_time = (alight_time - ride.board_time).abs();
        let c1 = ctx.cost.transit_arrival_cost(
            ride.board_c1,
            alight_slack,
            transit_time,
            ride.reluctance_index,
            stop,
        );
        let arrival = StopArrival {
            stop,
            arrival_time,
            c1,
            c2: ride.c2,
            pareto_round: previous.next_transit_round(),
            origin_time: previous.origin_time,
            previous: Some(ride.previous_arrival),
            kind: ArrivalKind::Transit {
                trip: ride.trip,
                board_stop: ride.board_stop,
                board_pos: ride.board_pos,
                board_time: ride.board_time,
                alight_pos,
                alight_time,
            },
        };
        self.cache_arrival(arrival);
    }

    /// Relax transfers from this round's transit arrivals at `from_stop`.
    pub fn transfer_to_stops(&mut self, from_stop: StopIndex) {
        let ctx = self.ctx;
        let transfers = ctx.calculator.transfers(ctx.transfers, from_stop);
        if transfers.is_empty() {
            return;
        }

        for key in self.list_stop_arrivals_previous_round(from_stop) {
            let previous = *self.arena.get(key.id);
            if !previous.arrived_on_board() {
                continue;
            }
            for transfer in transfers.iter() {
                let arrival_time = ctx.calculator.plus(previous.arrival_time, transfer.duration);
                if ctx.calculator.exceeds_time_limit(arrival_time) {
                    continue;
                }
                self.cache_arrival(StopArrival {
                    stop: transfer.stop,
                    arrival_time,
                    c1: previous.c1.saturating_add(transfer.c1),
                    c2: ctx.pass_through.update(previous.c2, transfer.stop),
                    pareto_round: previous.next_transfer_round(),
                    origin_time: previous.origin_time,
                    previous: Some(key.id),
                    kind: ArrivalKind::Transfer {
                        transfer: *transfer,
                    },
                });
            }
        }
    }

    /// Store an arrival for the end of the phase, unless its stop already
    /// holds something better.
    fn cache_arrival(&mut self, arrival: StopArrival) {
        let key = ArrivalKey::new(self.arena.next_id(), &arrival);
        if !self.arrivals.qualify(arrival.stop, &key) {
            return;
        }
        let id = self.arena.push(arrival);
        self.cache.push(id);
    }

    pub fn transits_for_round_complete(&mut self) {
        self.arrivals.clear_touched_stops_and_set_stop_markers();
        self.commit_cached_arrivals();
    }

    pub fn transfers_for_round_complete(&mut self) {
        self.commit_cached_arrivals();
    }

    fn commit_cached_arrivals(&mut self) {
        let committed = self.cache.len();
        for id in self.cache.drain(..) {
            self.arrivals.add_stop_arrival(self.ctx, &self.arena, id);
        }
        trace!(
            committed,
            touched = self.arrivals.touched_stops().len(),
            "arrivals committed"
        );
    }

    pub fn destination_arrivals(&self) -> impl Iterator<Item = &DestinationArrival> {
        self.arrivals.destination().iter()
    }

    pub fn arena(&self) -> &ArrivalArena {
        &self.arena
    }

    /// Arrivals still held in the stop sets.
    pub fn stop_arrivals_size(&self) -> usize {
        self.arrivals.size()
    }
}
