//! Transfers between stops and their conversion into search transfers.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{DomainError, MAX_LEG_DURATION, StopIndex, to_router_cost};
use crate::util::Throttle;

use super::{TransferMode, TransferRequest};

/// Upper bound for the cost of one transfer, in seconds.
///
/// Street costs above this (or negative ones) come from broken data and
/// are clamped so they cannot overflow the search's integer costs.
pub const MAX_TRANSFER_COST: i32 = 2_000_000;

/// Modes allowed to traverse a street edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreetPermission(u8);

impl StreetPermission {
    pub const NONE: Self = Self(0);
    pub const WALK: Self = Self(1);
    pub const BIKE: Self = Self(2);
    pub const CAR: Self = Self(4);
    pub const ALL: Self = Self(7);

    pub fn allows(self, mode: TransferMode) -> bool {
        let bit = match mode {
            TransferMode::Walk => Self::WALK,
            TransferMode::Bike => Self::BIKE,
            TransferMode::Car => Self::CAR,
        };
        self.0 & bit.0 != 0
    }
}

impl Default for StreetPermission {
    fn default() -> Self {
        Self::ALL
    }
}

/// One street edge of a transfer path, opaque to the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetEdge {
    pub distance_meters: f64,
    #[serde(default)]
    pub permission: StreetPermission,
    #[serde(default = "default_true")]
    pub wheelchair_accessible: bool,
    /// Multiplies the request reluctance on this edge.
    #[serde(default = "default_cost_factor")]
    pub cost_factor: f64,
}

fn default_true() -> bool {
    true
}

fn default_cost_factor() -> f64 {
    1.0
}

impl StreetEdge {
    pub fn new(distance_meters: f64) -> Self {
        Self {
            distance_meters,
            permission: StreetPermission::ALL,
            wheelchair_accessible: true,
            cost_factor: 1.0,
        }
    }
}

/// A street connection from one stop to another.
///
/// Without edges the transfer is a straight walk of `distance_meters`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    to_stop: StopIndex,
    distance_meters: i32,
    edges: Option<Vec<StreetEdge>>,
}

impl Transfer {
    pub fn new(
        to_stop: StopIndex,
        distance_meters: i32,
        edges: Option<Vec<StreetEdge>>,
    ) -> Result<Self, DomainError> {
        if distance_meters < 0 {
            return Err(DomainError::NegativeDistance(distance_meters));
        }
        Ok(Self {
            to_stop,
            distance_meters,
            edges,
        })
    }

    pub fn to_stop(&self) -> StopIndex {
        self.to_stop
    }

    pub fn distance_meters(&self) -> i32 {
        self.distance_meters
    }

    pub fn edges(&self) -> Option<&[StreetEdge]> {
        self.edges.as_deref()
    }

    /// Duration and cost of this transfer for a request.
    ///
    /// Returns `None` when an edge cannot be traversed with the requested
    /// mode, or when the walk would take longer than `MAX_LEG_DURATION`.
    /// Transfers without edges are always walked.
    pub fn to_raptor_transfer(
        &self,
        request: &TransferRequest,
        throttle: &Throttle,
    ) -> Option<RaptorTransfer> {
        let edges = match self.edges.as_deref() {
            Some(edges) if !edges.is_empty() => edges,
            _ => {
                let duration = f64::from(self.distance_meters) / request.walk_speed.0;
                let cost = duration * request.reluctance.0;
                return self.raptor_transfer(duration, cost, throttle);
            }
        };

        let speed = request.speed();
        let mut duration = 0.0;
        let mut cost = 0.0;
        for edge in edges {
            if !edge.permission.allows(request.mode) {
                return None;
            }
            let seconds = edge.distance_meters / speed;
            let mut reluctance = request.reluctance.0 * edge.cost_factor;
            if request.wheelchair && !edge.wheelchair_accessible {
                reluctance *= request.inaccessible_street_reluctance.0;
            }
            duration += seconds;
            cost += seconds * reluctance;
        }
        self.raptor_transfer(duration, cost, throttle)
    }

    fn raptor_transfer(
        &self,
        duration: f64,
        cost: f64,
        throttle: &Throttle,
    ) -> Option<RaptorTransfer> {
        let duration = duration.ceil();
        if !(0.0..=f64::from(MAX_LEG_DURATION)).contains(&duration) {
            if throttle.allow() {
                warn!(
                    duration,
                    to_stop = %self.to_stop,
                    distance_meters = self.distance_meters,
                    max = MAX_LEG_DURATION,
                    "transfer duration out of range, dropping transfer"
                );
            }
            return None;
        }
        let cost = clamp_transfer_cost(cost, throttle, self);
        Some(RaptorTransfer {
            stop: self.to_stop,
            duration: duration as i32,
            c1: to_router_cost(cost),
        })
    }
}

/// Clamp a street cost in seconds to `[0, MAX_TRANSFER_COST]`.
///
/// In-range costs are truncated to whole seconds. Out-of-range costs
/// (including NaN) become `MAX_TRANSFER_COST`.
pub fn clamp_transfer_cost(cost: f64, throttle: &Throttle, transfer: &Transfer) -> i32 {
    if (0.0..=f64::from(MAX_TRANSFER_COST)).contains(&cost) {
        return cost.trunc() as i32;
    }
    if throttle.allow() {
        warn!(
            cost,
            to_stop = %transfer.to_stop,
            distance_meters = transfer.distance_meters,
            max = MAX_TRANSFER_COST,
            "transfer cost out of range, clamping"
        );
    }
    MAX_TRANSFER_COST
}

/// A transfer as the search sees it: target stop, duration and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaptorTransfer {
    pub stop: StopIndex,
    /// Seconds.
    pub duration: i32,
    /// Router cost units.
    pub c1: i32,
}

impl RaptorTransfer {
    /// The same transfer walked the other way, ending at `from_stop`.
    pub fn reverse_of(&self, from_stop: StopIndex) -> Self {
        Self {
            stop: from_stop,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    fn walk_request() -> TransferRequest {
        TransferRequest {
            walk_speed: OrderedFloat(1.0),
            reluctance: OrderedFloat(2.0),
            ..TransferRequest::default()
        }
    }

    #[test]
    fn negative_distance_rejected() {
        assert_eq!(
            Transfer::new(StopIndex(1), -1, None),
            Err(DomainError::NegativeDistance(-1))
        );
    }

    #[test]
    fn straight_walk() {
        let tx = Transfer::new(StopIndex(3), 100, None).unwrap();
        let rt = tx.to_raptor_transfer(&walk_request(), &Throttle::default()).unwrap();
        assert_eq!(rt.stop, StopIndex(3));
        assert_eq!(rt.duration, 100);
        assert_eq!(rt.c1, 200 * 100);
    }

    #[test]
    fn duration_rounds_up() {
        let req = TransferRequest {
            walk_speed: OrderedFloat(3.0),
            ..walk_request()
        };
        let tx = Transfer::new(StopIndex(0), 100, None).unwrap();
        let rt = tx.to_raptor_transfer(&req, &Throttle::default()).unwrap();
        assert_eq!(rt.duration, 34);
    }

    #[test]
    fn edges_follow_mode_and_factors() {
        let edges = vec![
            StreetEdge::new(50.0),
            StreetEdge {
                cost_factor: 3.0,
                ..StreetEdge::new(50.0)
            },
        ];
        let tx = Transfer::new(StopIndex(1), 100, Some(edges)).unwrap();
        let rt = tx.to_raptor_transfer(&walk_request(), &Throttle::default()).unwrap();
        assert_eq!(rt.duration, 100);
        // 50s * 2.0 + 50s * 2.0 * 3.0
        assert_eq!(rt.c1, 400 * 100);
    }

    #[test]
    fn forbidden_edge_drops_transfer() {
        let edges = vec![StreetEdge {
            permission: StreetPermission::WALK,
            ..StreetEdge::new(10.0)
        }];
        let tx = Transfer::new(StopIndex(1), 10, Some(edges)).unwrap();
        let bike = TransferRequest {
            mode: TransferMode::Bike,
            ..walk_request()
        };
        assert!(tx.to_raptor_transfer(&walk_request(), &Throttle::default()).is_some());
        assert!(tx.to_raptor_transfer(&bike, &Throttle::default()).is_none());
    }

    #[test]
    fn wheelchair_penalises_inaccessible_edges() {
        let edges = vec![StreetEdge {
            wheelchair_accessible: false,
            ..StreetEdge::new(10.0)
        }];
        let tx = Transfer::new(StopIndex(1), 10, Some(edges)).unwrap();
        let req = TransferRequest {
            wheelchair: true,
            inaccessible_street_reluctance: OrderedFloat(10.0),
            ..walk_request()
        };
        let rt = tx.to_raptor_transfer(&req, &Throttle::default()).unwrap();
        assert_eq!(rt.c1, 10 * 2 * 10 * 100);
    }

    #[test]
    fn cost_is_clamped() {
        let throttle = Throttle::default();
        let tx = Transfer::new(StopIndex(0), 0, None).unwrap();
        assert_eq!(clamp_transfer_cost(2_000_001.0, &throttle, &tx), MAX_TRANSFER_COST);
        assert_eq!(clamp_transfer_cost(2_000_000.0, &throttle, &tx), MAX_TRANSFER_COST);
        assert_eq!(clamp_transfer_cost(1e300, &throttle, &tx), MAX_TRANSFER_COST);
        assert_eq!(clamp_transfer_cost(-1.0, &throttle, &tx), MAX_TRANSFER_COST);
        assert_eq!(clamp_transfer_cost(f64::NAN, &throttle, &tx), MAX_TRANSFER_COST);
        assert_eq!(clamp_transfer_cost(12.4, &throttle, &tx), 12);
        assert_eq!(clamp_transfer_cost(12.6, &throttle, &tx), 12);
    }

    #[test]
    fn astronomical_transfer_cost_is_clamped() {
        let edges = vec![StreetEdge {
            cost_factor: 1e12,
            ..StreetEdge::new(1000.0)
        }];
        let tx = Transfer::new(StopIndex(1), 1000, Some(edges)).unwrap();
        let rt = tx.to_raptor_transfer(&walk_request(), &Throttle::default()).unwrap();
        assert_eq!(rt.c1, MAX_TRANSFER_COST * 100);
        assert_eq!(rt.duration, 1000);
    }

    #[test]
    fn endless_transfer_is_dropped() {
        let throttle = Throttle::default();
        let edges = vec![StreetEdge::new(1e10)];
        let tx = Transfer::new(StopIndex(2), 1000, Some(edges)).unwrap();
        assert!(tx.to_raptor_transfer(&walk_request(), &throttle).is_none());

        let tx = Transfer::new(StopIndex(2), i32::MAX, None).unwrap();
        assert!(tx.to_raptor_transfer(&walk_request(), &throttle).is_none());

        let edges = vec![StreetEdge::new(f64::NAN)];
        let tx = Transfer::new(StopIndex(2), 0, Some(edges)).unwrap();
        assert!(tx.to_raptor_transfer(&walk_request(), &throttle).is_none());
    }

    #[test]
    fn longest_transfer_is_kept() {
        let tx = Transfer::new(StopIndex(2), MAX_LEG_DURATION, None).unwrap();
        let req = TransferRequest {
            walk_speed: OrderedFloat(1.0),
            reluctance: OrderedFloat(1.0),
            ..TransferRequest::default()
        };
        let rt = tx.to_raptor_transfer(&req, &Throttle::default()).unwrap();
        assert_eq!(rt.duration, MAX_LEG_DURATION);
        assert_eq!(rt.c1, MAX_TRANSFER_COST * 100);
    }

    #[test]
    fn reverse_keeps_duration_and_cost() {
        let rt = RaptorTransfer {
            stop: StopIndex(4),
            duration: 60,
            c1: 9000,
        };
        let rev = rt.reverse_of(StopIndex(1));
        assert_eq!(rev.stop, StopIndex(1));
        assert_eq!((rev.duration, rev.c1), (60, 9000));
    }
}
