//! The Range-RAPTOR main loop.

use tracing::{debug, trace};

use super::{
    McRangeRaptorWorkerState, MultiCriteriaRoutingStrategy, Path, SearchContext, map_path,
};

/// Counts rounds and caps them once the destination has been reached.
#[derive(Debug, Clone)]
pub struct RoundTracker {
    round: u32,
    round_max_limit: u32,
    additional_transfers: u32,
    destination_reached: bool,
}

impl RoundTracker {
    pub fn new(max_number_of_transfers: usize, additional_transfers: usize) -> Self {
        Self {
            round: 0,
            round_max_limit: max_number_of_transfers as u32 + 1,
            additional_transfers: additional_transfers as u32,
            destination_reached: false,
        }
    }

    pub fn setup_iteration(&mut self) {
        self.round = 0;
    }

    pub fn next_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn has_more_rounds(&self) -> bool {
        self.round < self.round_max_limit
    }

    /// The first time the destination is reached, allow only a few more
    /// rounds for the rest of the search.
    pub fn round_complete(&mut self, destination_reached: bool) {
        if destination_reached && !self.destination_reached {
            self.destination_reached = true;
            self.round_max_limit = self
                .round_max_limit
                .min(self.round + self.additional_transfers);
        }
    }
}

/// What a finished search produced.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub paths: Vec<Path>,
    pub iterations: usize,
    pub max_round: u32,
    pub arrivals_created: usize,
}

/// Runs all iterations of one search.
pub struct RangeRaptorWorker<'a> {
    ctx: &'a SearchContext<'a>,
    state: McRangeRaptorWorkerState<'a>,
    strategy: MultiCriteriaRoutingStrategy<'a>,
    round_tracker: RoundTracker,
    min_rounds: u32,
}

impl<'a> RangeRaptorWorker<'a> {
    pub fn new(ctx: &'a SearchContext<'a>) -> Self {
        Self {
            ctx,
            state: McRangeRaptorWorkerState::new(ctx),
            strategy: MultiCriteriaRoutingStrategy::new(ctx),
            round_tracker: RoundTracker::new(
                ctx.max_number_of_transfers,
                ctx.max_additional_transfers,
            ),
            min_rounds: ctx.max_access_rides(),
        }
    }

    /// Iterate over the search window; state carries over between
    /// iterations so later departures bound earlier ones.
    pub fn route(mut self) -> WorkerResult {
        let minutes = self.ctx.calculator.range_raptor_minutes();
        let mut max_round = 0;

        for &iteration_time in &minutes {
            self.state.setup_iteration();
            self.round_tracker.setup_iteration();
            self.run_raptor_for_minute(iteration_time);
            max_round = max_round.max(self.round_tracker.round());
        }

        let arena = self.state.arena();
        let paths: Vec<Path> = self
            .state
            .destination_arrivals()
            .map(|dest| map_path(self.ctx, arena, dest))
            .collect();

        debug!(
            iterations = minutes.len(),
            max_round,
            arrivals = arena.len(),
            stop_arrivals = self.state.stop_arrivals_size(),
            paths = paths.len(),
            "range raptor search complete"
        );

        WorkerResult {
            paths,
            iterations: minutes.len(),
            max_round,
            arrivals_created: arena.len(),
        }
    }

    fn run_raptor_for_minute(&mut self, iteration_time: i32) {
        self.find_access_on_street_for_round(iteration_time);

        while self.has_more_rounds() {
            let round = self.round_tracker.next_round();
            self.state.prepare_for_next_round();

            self.find_transit_for_round();
            self.find_access_on_board_for_round(iteration_time);
            self.find_transfers_for_round();

            self.round_tracker
                .round_complete(self.state.is_destination_reached_in_current_round());
            self.find_access_on_street_for_round(iteration_time);
            trace!(iteration_time, round, "round complete");
        }
    }

    fn has_more_rounds(&self) -> bool {
        let access_pending = self.round_tracker.round() < self.min_rounds;
        (access_pending || self.state.is_new_round_available())
            && self.round_tracker.has_more_rounds()
    }

    fn find_transit_for_round(&mut self) {
        let ctx = self.ctx;
        let calc = &ctx.calculator;
        let stops = self.state.stops_touched_previous_round();

        for pattern_index in ctx.data.routes_touched_by(&stops) {
            let route = ctx.data.route(pattern_index);
            let pattern = &route.pattern;
            let board_slack = ctx.slack.board_slack(pattern.slack_index());
            let alight_slack = ctx.slack.alight_slack(pattern.slack_index());

            self.strategy.prepare_for_transit_with();

            for stop_pos in calc.stop_positions(pattern.number_of_stops()) {
                let stop = pattern.stop(stop_pos);
                self.strategy.pass_stop(stop);

                if calc.alighting_possible_at(pattern, stop_pos) {
                    self.strategy
                        .alight(&mut self.state, route, stop, stop_pos, alight_slack);
                }
                if calc.boarding_possible_at(pattern, stop_pos) {
                    self.strategy.board_all(
                        &mut self.state,
                        pattern_index,
                        route,
                        stop,
                        stop_pos,
                        board_slack,
                    );
                }
            }
        }
        self.state.transits_for_round_complete();
    }

    fn find_transfers_for_round(&mut self) {
        for stop in self.state.stops_touched_by_transit_current_round() {
            self.state.transfer_to_stops(stop);
        }
        self.state.transfers_for_round_complete();
    }

    /// Access paths ending on board a vehicle join as transit arrivals of
    /// the round matching their number of rides.
    fn find_access_on_board_for_round(&mut self, iteration_time: i32) {
        self.add_access_paths(iteration_time, true);
    }

    /// Walking access joins in round 0; access with rides ending on the
    /// street joins after the transfers of its round.
    fn find_access_on_street_for_round(&mut self, iteration_time: i32) {
        self.add_access_paths(iteration_time, false);
    }

    fn add_access_paths(&mut self, iteration_time: i32, on_board: bool) {
        let round = self.round_tracker.round();
        for (i, access) in self.ctx.access.iter().enumerate() {
            if access.number_of_rides() == round && access.stop_reached_on_board() == on_board {
                self.state.add_access_arrival(iteration_time, i);
            }
        }
    }
}
