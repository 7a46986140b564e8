//! Per-request search parameters.

use serde::{Deserialize, Serialize};

use crate::domain::StopIndex;
use crate::transfer::TransferRequest;

use super::AccessEgress;

/// Which way the search runs through time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// Depart after a time; search from origin to destination.
    #[default]
    Forward,
    /// Arrive before a time; search from destination back to origin.
    Reverse,
}

impl SearchDirection {
    pub fn is_forward(self) -> bool {
        self == Self::Forward
    }
}

/// Slack times in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackParams {
    /// Minimum time between alighting one trip and boarding the next.
    pub transfer_slack: i32,
    /// Board slack per pattern slack index.
    pub board_slack: Vec<i32>,
    /// Alight slack per pattern slack index.
    pub alight_slack: Vec<i32>,
}

impl Default for SlackParams {
    fn default() -> Self {
        Self {
            transfer_slack: 120,
            board_slack: Vec::new(),
            alight_slack: Vec::new(),
        }
    }
}

/// Generalized cost parameters. Costs are in seconds, reluctances are
/// multipliers on seconds spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParams {
    pub board_cost: i32,
    /// Added to the board cost on every boarding but the first.
    pub transfer_cost: i32,
    pub wait_reluctance: f64,
    /// Transit reluctance per trip reluctance index.
    pub transit_reluctance: Vec<f64>,
    /// Extra cost for transferring at each stop, indexed by stop.
    pub stop_transfer_cost: Option<Vec<i32>>,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            board_cost: 600,
            transfer_cost: 0,
            wait_reluctance: 1.0,
            transit_reluctance: vec![1.0],
            stop_transfer_cost: None,
        }
    }
}

/// Everything a single search needs besides the network.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub direction: SearchDirection,
    pub earliest_departure_time: Option<i32>,
    pub latest_arrival_time: Option<i32>,
    /// Width of the departure (reverse: arrival) window, in seconds.
    pub search_window: i32,
    pub max_number_of_transfers: usize,
    pub max_journey_duration: i32,
    pub access: Vec<AccessEgress>,
    pub egress: Vec<AccessEgress>,
    /// Stops that must be visited in order; each point is satisfied by any
    /// of its stops.
    pub pass_through_points: Vec<Vec<StopIndex>>,
    pub slack: SlackParams,
    pub cost: CostParams,
    pub transfer: TransferRequest,
    pub use_constrained_transfers: bool,
}

impl SearchRequest {
    /// A forward search departing at or after `earliest_departure_time`.
    pub fn depart_after(earliest_departure_time: i32) -> Self {
        Self {
            earliest_departure_time: Some(earliest_departure_time),
            ..Self::empty(SearchDirection::Forward)
        }
    }

    /// A reverse search arriving at or before `latest_arrival_time`.
    pub fn arrive_by(latest_arrival_time: i32) -> Self {
        Self {
            latest_arrival_time: Some(latest_arrival_time),
            ..Self::empty(SearchDirection::Reverse)
        }
    }

    fn empty(direction: SearchDirection) -> Self {
        Self {
            direction,
            earliest_departure_time: None,
            latest_arrival_time: None,
            search_window: 3600,
            max_number_of_transfers: 12,
            max_journey_duration: 24 * 3600,
            access: Vec::new(),
            egress: Vec::new(),
            pass_through_points: Vec::new(),
            slack: SlackParams::default(),
            cost: CostParams::default(),
            transfer: TransferRequest::default(),
            use_constrained_transfers: true,
        }
    }
}
