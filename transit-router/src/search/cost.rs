//! The generalized cost model.
//!
//! Every value here is in router cost units (centi-seconds). Factors are
//! reluctances scaled the same way, so `factor * seconds` is a cost.

use crate::domain::{StopIndex, to_router_cost, to_router_factor};
use crate::transit::TransferConstraintKind;

use super::{AccessEgress, CostParams};

#[derive(Debug, Clone)]
pub struct CostCalculator {
    board_cost_only: i32,
    board_and_transfer_cost: i32,
    transfer_cost_only: i32,
    wait_factor: i32,
    transit_factors: Vec<i32>,
    stop_transfer_cost: Option<Vec<i32>>,
}

impl CostCalculator {
    pub fn new(params: &CostParams) -> Self {
        let board_cost_only = to_router_cost(params.board_cost);
        let transfer_cost_only = to_router_cost(params.transfer_cost);
        let mut transit_factors: Vec<i32> = params
            .transit_reluctance
            .iter()
            .map(|&r| to_router_factor(r))
            .collect();
        if transit_factors.is_empty() {
            transit_factors.push(to_router_factor(1.0));
        }
        Self {
            board_cost_only,
            board_and_transfer_cost: board_cost_only + transfer_cost_only,
            transfer_cost_only,
            wait_factor: to_router_factor(params.wait_reluctance),
            transit_factors,
            stop_transfer_cost: params
                .stop_transfer_cost
                .as_ref()
                .map(|costs| costs.iter().map(|&c| to_router_cost(c)).collect()),
        }
    }

    /// Reluctance for a trip's reluctance index; unknown indexes use the
    /// last configured factor.
    pub fn transit_factor(&self, reluctance_index: usize) -> i32 {
        self.transit_factors
            .get(reluctance_index)
            .or(self.transit_factors.last())
            .copied()
            .unwrap_or(100)
    }

    pub fn wait_cost(&self, seconds: i32) -> i32 {
        self.wait_factor * seconds
    }

    fn stop_transfer_cost(&self, stop: StopIndex) -> i32 {
        self.stop_transfer_cost
            .as_ref()
            .and_then(|costs| costs.get(stop.index()).copied())
            .unwrap_or(0)
    }

    /// Cost of boarding, excluding the cost accumulated before it.
    ///
    /// Waiting is priced at wait reluctance. A guaranteed transfer costs
    /// only the wait; staying seated prices the wait as riding.
    pub fn boarding_cost(
        &self,
        first_boarding: bool,
        prev_arrival_time: i32,
        board_stop: StopIndex,
        board_time: i32,
        reluctance_index: usize,
        constraint: Option<TransferConstraintKind>,
    ) -> i32 {
        let wait_time = (board_time - prev_arrival_time).abs();
        match constraint {
            Some(TransferConstraintKind::StaySeated) if !first_boarding => {
                self.transit_factor(reluctance_index) * wait_time
            }
            Some(TransferConstraintKind::Guaranteed) if !first_boarding => {
                self.wait_cost(wait_time)
            }
            _ => {
                let board = if first_boarding {
                    self.board_cost_only
                } else {
                    self.board_and_transfer_cost
                };
                self.wait_cost(wait_time) + board + self.stop_transfer_cost(board_stop)
            }
        }
    }

    /// Total cost when alighting: the ride's board cost plus time on board
    /// and the alight slack.
    pub fn transit_arrival_cost(
        &self,
        board_c1: i32,
        alight_slack: i32,
        transit_time: i32,
        reluctance_index: usize,
        to_stop: StopIndex,
    ) -> i32 {
        board_c1
            + self.transit_factor(reluctance_index) * transit_time
            + self.wait_cost(alight_slack)
            + self.stop_transfer_cost(to_stop)
    }

    /// Cost of an egress path; egress with rides counts as a transfer.
    pub fn cost_egress(&self, egress: &AccessEgress) -> i32 {
        if egress.has_rides() {
            egress.c1() + self.transfer_cost_only
        } else {
            egress.c1() + self.stop_transfer_cost(egress.stop())
        }
    }
}
