//! Constrained transfers between specific trips.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{StopIndex, TripRef};

/// How a transfer between two trips is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferConstraintKind {
    /// The connecting trip waits; no board slack applies.
    Guaranteed,
    /// Passengers stay in the vehicle; no board slack applies.
    StaySeated,
    /// The connection may not be made at all.
    NotAllowed,
}

impl TransferConstraintKind {
    /// Whether the connection may be used, bypassing board slack.
    pub fn is_facilitated(self) -> bool {
        matches!(self, Self::Guaranteed | Self::StaySeated)
    }
}

/// A constraint on transferring from one trip at one stop to another trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstrainedTransfer {
    pub from_trip: TripRef,
    pub from_stop: StopIndex,
    pub to_trip: TripRef,
    pub to_stop: StopIndex,
    pub kind: TransferConstraintKind,
}

/// Constrained transfers indexed by both ends.
#[derive(Debug, Clone, Default)]
pub struct ConstrainedTransfers {
    transfers: Vec<ConstrainedTransfer>,
    by_from: HashMap<(TripRef, StopIndex), Vec<usize>>,
    by_to: HashMap<(TripRef, StopIndex), Vec<usize>>,
}

impl ConstrainedTransfers {
    pub fn new(transfers: Vec<ConstrainedTransfer>) -> Self {
        let mut by_from: HashMap<_, Vec<usize>> = HashMap::new();
        let mut by_to: HashMap<_, Vec<usize>> = HashMap::new();
        for (i, tx) in transfers.iter().enumerate() {
            by_from.entry((tx.from_trip, tx.from_stop)).or_default().push(i);
            by_to.entry((tx.to_trip, tx.to_stop)).or_default().push(i);
        }
        Self {
            transfers,
            by_from,
            by_to,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    /// Constraints on leaving `trip` at `stop`.
    pub fn from_trip(
        &self,
        trip: TripRef,
        stop: StopIndex,
    ) -> impl Iterator<Item = &ConstrainedTransfer> + '_ {
        self.lookup(&self.by_from, trip, stop)
    }

    /// Constraints on boarding `trip` at `stop`.
    pub fn to_trip(
        &self,
        trip: TripRef,
        stop: StopIndex,
    ) -> impl Iterator<Item = &ConstrainedTransfer> + '_ {
        self.lookup(&self.by_to, trip, stop)
    }

    fn lookup<'a>(
        &'a self,
        index: &'a HashMap<(TripRef, StopIndex), Vec<usize>>,
        trip: TripRef,
        stop: StopIndex,
    ) -> impl Iterator<Item = &'a ConstrainedTransfer> + 'a {
        index
            .get(&(trip, stop))
            .into_iter()
            .flatten()
            .map(|&i| &self.transfers[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatternIndex;

    #[test]
    fn lookup_by_both_ends() {
        let a = TripRef::new(PatternIndex(0), 0);
        let b = TripRef::new(PatternIndex(1), 3);
        let tx = ConstrainedTransfer {
            from_trip: a,
            from_stop: StopIndex(2),
            to_trip: b,
            to_stop: StopIndex(2),
            kind: TransferConstraintKind::Guaranteed,
        };
        let constraints = ConstrainedTransfers::new(vec![tx]);

        assert_eq!(constraints.from_trip(a, StopIndex(2)).count(), 1);
        assert_eq!(constraints.from_trip(a, StopIndex(1)).count(), 0);
        assert_eq!(constraints.to_trip(b, StopIndex(2)).next(), Some(&tx));
        assert_eq!(constraints.to_trip(a, StopIndex(2)).count(), 0);
    }

    #[test]
    fn facilitated_kinds() {
        assert!(TransferConstraintKind::Guaranteed.is_facilitated());
        assert!(TransferConstraintKind::StaySeated.is_facilitated());
        assert!(!TransferConstraintKind::NotAllowed.is_facilitated());
    }
}
