//! Stop arrivals and the arena they live in.
//!
//! Each arrival points back to the arrival it was reached from, forming a
//! chain to an access path. Arrivals are never freed during a search, so a
//! chain stays valid even after its head is dominated at its stop.

use crate::domain::{StopIndex, TripRef};
use crate::paretoset::ParetoComparator;
use crate::transfer::RaptorTransfer;

/// Handle to an arrival in an [`ArrivalArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrivalId(u32);

impl ArrivalId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a stop was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalKind {
    /// Directly from the origin; `path` indexes the search's access list.
    Access { path: usize },
    /// By riding `trip` from `board_stop`.
    Transit {
        trip: TripRef,
        board_stop: StopIndex,
        board_pos: usize,
        board_time: i32,
        alight_pos: usize,
        /// Scheduled alight time, before alight slack.
        alight_time: i32,
    },
    /// By a street transfer from the previous arrival's stop.
    Transfer { transfer: RaptorTransfer },
}

/// A state reached at a stop, with its criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopArrival {
    pub stop: StopIndex,
    pub arrival_time: i32,
    pub c1: i32,
    pub c2: i32,
    /// Odd for transit arrivals, even for access and transfer arrivals;
    /// see [`StopArrival::round`].
    pub pareto_round: u32,
    /// Departure time from the origin in search terms.
    pub origin_time: i32,
    pub previous: Option<ArrivalId>,
    pub kind: ArrivalKind,
}

impl StopArrival {
    /// Number of transit rides used to get here.
    pub fn round(&self) -> u32 {
        (self.pareto_round + 1) / 2
    }

    pub fn arrived_by_access(&self) -> bool {
        matches!(self.kind, ArrivalKind::Access { .. })
    }

    pub fn arrived_by_transit(&self) -> bool {
        matches!(self.kind, ArrivalKind::Transit { .. })
    }

    /// Whether the traveller is still in a vehicle when reaching the stop.
    pub fn arrived_on_board(&self) -> bool {
        self.pareto_round % 2 == 1
    }

    /// Pareto round of a transit arrival reached from this one.
    pub fn next_transit_round(&self) -> u32 {
        2 * (self.round() + 1) - 1
    }

    /// Pareto round of a transfer arrival reached from this one.
    pub fn next_transfer_round(&self) -> u32 {
        2 * self.round()
    }
}

/// Append-only storage for one search's arrivals.
#[derive(Debug, Default)]
pub struct ArrivalArena {
    arrivals: Vec<StopArrival>,
}

impl ArrivalArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arrival: StopArrival) -> ArrivalId {
        self.arrivals.push(arrival);
        ArrivalId((self.arrivals.len() - 1) as u32)
    }

    /// The id the next pushed arrival will get.
    pub fn next_id(&self) -> ArrivalId {
        ArrivalId(self.arrivals.len() as u32)
    }

    pub fn get(&self, id: ArrivalId) -> &StopArrival {
        &self.arrivals[id.index()]
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// The chain ending at `id`, from `id` back to its access arrival.
    pub fn chain(&self, id: ArrivalId) -> impl Iterator<Item = &StopArrival> + '_ {
        std::iter::successors(Some(self.get(id)), move |a| a.previous.map(|p| self.get(p)))
    }
}

/// The criteria of an arrival, as stored in a stop's Pareto set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalKey {
    pub id: ArrivalId,
    pub arrival_time: i32,
    pub pareto_round: u32,
    pub c1: i32,
    pub c2: i32,
}

impl ArrivalKey {
    pub fn new(id: ArrivalId, arrival: &StopArrival) -> Self {
        Self {
            id,
            arrival_time: arrival.arrival_time,
            pareto_round: arrival.pareto_round,
            c1: arrival.c1,
            c2: arrival.c2,
        }
    }
}

/// Dominance between arrivals at one stop: earlier arrival, lower pareto
/// round, lower cost, and (with pass-through points) higher c2.
#[derive(Debug, Clone, Copy)]
pub struct StopArrivalComparator {
    forward: bool,
    include_c2: bool,
}

impl StopArrivalComparator {
    pub fn new(forward: bool, include_c2: bool) -> Self {
        Self {
            forward,
            include_c2,
        }
    }
}

impl ParetoComparator<ArrivalKey> for StopArrivalComparator {
    fn left_dominance_exist(&self, left: &ArrivalKey, right: &ArrivalKey) -> bool {
        let earlier = if self.forward {
            left.arrival_time < right.arrival_time
        } else {
            left.arrival_time > right.arrival_time
        };
        earlier
            || left.pareto_round < right.pareto_round
            || left.c1 < right.c1
            || (self.include_c2 && left.c2 > right.c2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paretoset::ParetoSet;

    fn access(stop: usize, time: i32, c1: i32) -> StopArrival {
        StopArrival {
            stop: StopIndex(stop),
            arrival_time: time,
            c1,
            c2: 0,
            pareto_round: 0,
            origin_time: 0,
            previous: None,
            kind: ArrivalKind::Access { path: 0 },
        }
    }

    #[test]
    fn rounds_from_pareto_rounds() {
        let mut a = access(0, 0, 0);
        assert_eq!(a.round(), 0);
        assert_eq!(a.next_transit_round(), 1);
        a.pareto_round = 1;
        assert_eq!(a.round(), 1);
        assert!(a.arrived_on_board());
        assert_eq!(a.next_transfer_round(), 2);
        assert_eq!(a.next_transit_round(), 3);
        a.pareto_round = 2;
        assert_eq!(a.round(), 1);
        assert!(!a.arrived_on_board());
        assert_eq!(a.next_transit_round(), 3);
    }

    #[test]
    fn chain_walks_back_to_access() {
        let mut arena = ArrivalArena::new();
        let first = arena.push(access(0, 10, 0));
        let second = arena.push(StopArrival {
            previous: Some(first),
            stop: StopIndex(1),
            kind: ArrivalKind::Transfer {
                transfer: RaptorTransfer {
                    stop: StopIndex(1),
                    duration: 5,
                    c1: 500,
                },
            },
            ..access(1, 15, 500)
        });
        let stops: Vec<_> = arena.chain(second).map(|a| a.stop.index()).collect();
        assert_eq!(stops, vec![1, 0]);
        assert_eq!(arena.len(), 2);
        assert!(matches!(arena.get(second).kind, ArrivalKind::Transfer { .. }));
        assert!(arena.get(first).arrived_by_access());
    }

    #[test]
    fn stop_arrival_dominance() {
        let mut arena = ArrivalArena::new();
        let cmp = StopArrivalComparator::new(true, false);
        let mut set = ParetoSet::new(cmp);

        let mut key = |time, c1, round| {
            let mut a = access(0, time, c1);
            a.pareto_round = round;
            let id = arena.push(a);
            ArrivalKey::new(id, &a)
        };

        assert!(set.add(key(100, 500, 1)).is_accepted());
        // later and more expensive
        assert!(!set.add(key(110, 600, 1)).is_accepted());
        // later but cheaper
        assert!(set.add(key(110, 400, 1)).is_accepted());
        // same time and cost, but as a transfer in the same round
        assert!(!set.add(key(100, 500, 2)).is_accepted());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn reverse_prefers_later_times() {
        let cmp = StopArrivalComparator::new(false, false);
        let id = ArrivalArena::new().push(access(0, 0, 0));
        let late = ArrivalKey {
            id,
            arrival_time: 200,
            pareto_round: 0,
            c1: 0,
            c2: 0,
        };
        let early = ArrivalKey {
            arrival_time: 100,
            ..late
        };
        assert!(cmp.left_dominance_exist(&late, &early));
        assert!(!cmp.left_dominance_exist(&early, &late));
    }
}
