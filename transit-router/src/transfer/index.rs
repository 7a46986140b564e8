//! Transfer lookups for the search, in three caching strategies.
//!
//! Every strategy answers the same two questions for a stop: where can I
//! walk to from here (forward), and from where can I walk to here
//! (reversed). For each (from, to) pair only the cheapest transfer is kept;
//! on equal cost the first one listed wins. Forward lists keep the order in
//! which destinations first appear, reversed lists are ordered by from-stop.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::StopIndex;
use crate::util::Throttle;

use super::{RaptorTransfer, Transfer, TransferRequest};

/// Error building a transfer index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferIndexError {
    /// A transfer points to a stop outside the schedule.
    #[error("transfer from stop {from} to unknown stop {to} (only {number_of_stops} stops)")]
    UnknownStop {
        from: StopIndex,
        to: StopIndex,
        number_of_stops: usize,
    },

    /// The transfer table does not cover the schedule's stops.
    #[error("transfer table has {actual} stops, schedule has {expected}")]
    WrongNumberOfStops { expected: usize, actual: usize },
}

/// How the search's transfer index is built and cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferIndexStrategy {
    /// Everything computed up front, shared between requests.
    #[default]
    Precomputed,
    /// Computed lazily per stop and remembered for the request.
    OnDemand,
    /// Forward lists computed on every call.
    Uncached,
}

/// Forward and reversed transfers per stop, as seen by the search.
pub trait RaptorTransferIndex: Send + Sync {
    /// Transfers leaving `stop`.
    fn forward_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]>;

    /// Transfers arriving at `stop`; each result names the stop it starts from.
    fn reversed_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]>;

    fn number_of_stops(&self) -> usize;
}

/// The transfers leaving each stop, before any request is applied.
#[derive(Debug)]
pub struct TransfersByStop {
    transfers: Vec<Vec<Transfer>>,
    cost_log: Throttle,
}

impl TransfersByStop {
    /// Validate a transfer table for a schedule with `number_of_stops` stops.
    pub fn new(
        transfers: Vec<Vec<Transfer>>,
        number_of_stops: usize,
    ) -> Result<Self, TransferIndexError> {
        if transfers.len() != number_of_stops {
            return Err(TransferIndexError::WrongNumberOfStops {
                expected: number_of_stops,
                actual: transfers.len(),
            });
        }
        for (from, list) in transfers.iter().enumerate() {
            if let Some(tx) = list.iter().find(|tx| tx.to_stop().index() >= number_of_stops) {
                return Err(TransferIndexError::UnknownStop {
                    from: StopIndex(from),
                    to: tx.to_stop(),
                    number_of_stops,
                });
            }
        }
        Ok(Self {
            transfers,
            cost_log: Throttle::default(),
        })
    }

    /// A table with no transfers at all.
    pub fn empty(number_of_stops: usize) -> Self {
        Self {
            transfers: vec![Vec::new(); number_of_stops],
            cost_log: Throttle::default(),
        }
    }

    /// Rate limit for warnings about clamped or dropped transfers.
    pub fn with_cost_log_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.cost_log = Throttle::new(quiet_period);
        self
    }

    pub fn number_of_stops(&self) -> usize {
        self.transfers.len()
    }

    pub fn transfers_from(&self, stop: StopIndex) -> &[Transfer] {
        &self.transfers[stop.index()]
    }

    /// Request-specific transfers leaving `stop`, deduplicated per target.
    pub fn forward_for_stop(&self, stop: StopIndex, request: &TransferRequest) -> Vec<RaptorTransfer> {
        let mut result: Vec<RaptorTransfer> = Vec::new();
        for tx in self.transfers_from(stop) {
            let Some(candidate) = tx.to_raptor_transfer(request, &self.cost_log) else {
                continue;
            };
            match result.iter_mut().find(|t| t.stop == candidate.stop) {
                Some(existing) if candidate.c1 < existing.c1 => *existing = candidate,
                Some(_) => {}
                None => result.push(candidate),
            }
        }
        result
    }
}

/// Invert forward lists, visiting from-stops in ascending order.
fn invert(forward: &[Vec<RaptorTransfer>]) -> Vec<Vec<RaptorTransfer>> {
    let mut reversed = vec![Vec::new(); forward.len()];
    for (from, list) in forward.iter().enumerate() {
        for tx in list {
            reversed[tx.stop.index()].push(tx.reverse_of(StopIndex(from)));
        }
    }
    reversed
}

/// Both directions computed eagerly; forward lists in parallel.
#[derive(Debug)]
pub struct PrecomputedTransferIndex {
    forward: Vec<Vec<RaptorTransfer>>,
    reversed: Vec<Vec<RaptorTransfer>>,
}

impl PrecomputedTransferIndex {
    pub fn create(transfers: &TransfersByStop, request: &TransferRequest) -> Self {
        let forward: Vec<Vec<RaptorTransfer>> = (0..transfers.number_of_stops())
            .into_par_iter()
            .map(|stop| transfers.forward_for_stop(StopIndex(stop), request))
            .collect();
        let reversed = invert(&forward);
        debug!(
            stops = forward.len(),
            transfers = forward.iter().map(Vec::len).sum::<usize>(),
            "precomputed transfer index"
        );
        Self { forward, reversed }
    }
}

impl RaptorTransferIndex for PrecomputedTransferIndex {
    fn forward_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        Cow::Borrowed(&self.forward[stop.index()])
    }

    fn reversed_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        Cow::Borrowed(&self.reversed[stop.index()])
    }

    fn number_of_stops(&self) -> usize {
        self.forward.len()
    }
}

/// Computes lists lazily and remembers them.
///
/// Reversed lists need every forward list, so the first reversed lookup
/// scans all stops once to learn which stops reach which; each reversed
/// list is then filled from the forward slots on first use.
#[derive(Debug)]
pub struct OnDemandTransferIndex {
    transfers: Arc<TransfersByStop>,
    request: TransferRequest,
    forward: Vec<OnceLock<Vec<RaptorTransfer>>>,
    reverse_sources: OnceLock<Vec<Vec<StopIndex>>>,
    reversed: Vec<OnceLock<Vec<RaptorTransfer>>>,
}

impl OnDemandTransferIndex {
    pub fn new(transfers: Arc<TransfersByStop>, request: TransferRequest) -> Self {
        let n = transfers.number_of_stops();
        Self {
            transfers,
            request,
            forward: (0..n).map(|_| OnceLock::new()).collect(),
            reverse_sources: OnceLock::new(),
            reversed: (0..n).map(|_| OnceLock::new()).collect(),
        }
    }

    fn forward_slot(&self, stop: StopIndex) -> &[RaptorTransfer] {
        self.forward[stop.index()]
            .get_or_init(|| self.transfers.forward_for_stop(stop, &self.request))
    }

    /// Scan all forward lists once, recording for each stop which stops
    /// have a transfer to it.
    fn ensure_reverse_initialized(&self) -> &[Vec<StopIndex>] {
        self.reverse_sources.get_or_init(|| {
            let mut sources = vec![Vec::new(); self.forward.len()];
            for from in 0..self.forward.len() {
                for tx in self.forward_slot(StopIndex(from)) {
                    sources[tx.stop.index()].push(StopIndex(from));
                }
            }
            sources
        })
    }
}

impl RaptorTransferIndex for OnDemandTransferIndex {
    fn forward_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        Cow::Borrowed(self.forward_slot(stop))
    }

    fn reversed_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        let sources = self.ensure_reverse_initialized();
        let list = self.reversed[stop.index()].get_or_init(|| {
            sources[stop.index()]
                .iter()
                .filter_map(|&from| {
                    self.forward_slot(from)
                        .iter()
                        .find(|tx| tx.stop == stop)
                        .map(|tx| tx.reverse_of(from))
                })
                .collect()
        });
        Cow::Borrowed(list)
    }

    fn number_of_stops(&self) -> usize {
        self.forward.len()
    }
}

/// Forward lists are recomputed on every call; reversed lists are built
/// once, in the constructor.
#[derive(Debug)]
pub struct UncachedTransferIndex {
    transfers: Arc<TransfersByStop>,
    request: TransferRequest,
    reversed: Vec<Vec<RaptorTransfer>>,
}

impl UncachedTransferIndex {
    pub fn new(transfers: Arc<TransfersByStop>, request: TransferRequest) -> Self {
        let forward: Vec<Vec<RaptorTransfer>> = (0..transfers.number_of_stops())
            .map(|stop| transfers.forward_for_stop(StopIndex(stop), &request))
            .collect();
        let reversed = invert(&forward);
        Self {
            transfers,
            request,
            reversed,
        }
    }
}

impl RaptorTransferIndex for UncachedTransferIndex {
    fn forward_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        Cow::Owned(self.transfers.forward_for_stop(stop, &self.request))
    }

    fn reversed_transfers(&self, stop: StopIndex) -> Cow<'_, [RaptorTransfer]> {
        Cow::Borrowed(&self.reversed[stop.index()])
    }

    fn number_of_stops(&self) -> usize {
        self.reversed.len()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_table() -> impl Strategy<Value = Vec<Vec<(usize, i32)>>> {
        (1usize..8).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec((0..n, 0i32..500), 0..6), n)
        })
    }

    fn build(raw: &[Vec<(usize, i32)>]) -> Arc<TransfersByStop> {
        let table = raw
            .iter()
            .map(|list| {
                list.iter()
                    .map(|&(to, m)| Transfer::new(StopIndex(to), m, None).unwrap())
                    .collect()
            })
            .collect();
        Arc::new(TransfersByStop::new(table, raw.len()).unwrap())
    }

    proptest! {
        /// All strategies answer identically in both directions.
        #[test]
        fn strategies_agree(raw in arb_table()) {
            let t = build(&raw);
            let req = TransferRequest::default();
            let eager = PrecomputedTransferIndex::create(&t, &req);
            let lazy = OnDemandTransferIndex::new(t.clone(), req.clone());
            let uncached = UncachedTransferIndex::new(t.clone(), req);

            for stop in (0..raw.len()).map(StopIndex) {
                let (f, lf, uf) = (
                    eager.forward_transfers(stop),
                    lazy.forward_transfers(stop),
                    uncached.forward_transfers(stop),
                );
                prop_assert_eq!(&f[..], &lf[..]);
                prop_assert_eq!(&f[..], &uf[..]);

                let (r, lr, ur) = (
                    eager.reversed_transfers(stop),
                    lazy.reversed_transfers(stop),
                    uncached.reversed_transfers(stop),
                );
                prop_assert_eq!(&r[..], &lr[..]);
                prop_assert_eq!(&r[..], &ur[..]);
            }
        }

        /// Forward lists have one entry per target, with the lowest cost.
        #[test]
        fn forward_is_deduplicated(raw in arb_table()) {
            let t = build(&raw);
            let req = TransferRequest::default();
            let index = PrecomputedTransferIndex::create(&t, &req);
            for (from, list) in raw.iter().enumerate() {
                let fwd = index.forward_transfers(StopIndex(from));
                for tx in fwd.iter() {
                    prop_assert_eq!(fwd.iter().filter(|o| o.stop == tx.stop).count(), 1);
                    let cheapest = list
                        .iter()
                        .filter(|(to, _)| *to == tx.stop.index())
                        .map(|&(to, m)| {
                            Transfer::new(StopIndex(to), m, None)
                                .unwrap()
                                .to_raptor_transfer(&req, &Throttle::default())
                                .unwrap()
                                .c1
                        })
                        .min();
                    prop_assert_eq!(Some(tx.c1), cheapest);
                }
            }
        }
    }
}
