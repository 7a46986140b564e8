//! Caching layer for transfer indexes.
//!
//! Building a precomputed index touches every transfer in the network, so
//! it is done once per distinct `TransferRequest` and shared between all
//! searches using the same street parameters. Entries are evicted by
//! capacity only; the transfer table never changes under the cache.

use std::sync::Arc;

use moka::sync::Cache as MokaCache;
use tracing::debug;

use super::{
    OnDemandTransferIndex, PrecomputedTransferIndex, RaptorTransferIndex, TransferIndexStrategy,
    TransferRequest, TransfersByStop, UncachedTransferIndex,
};

/// Hands out transfer indexes for requests, caching precomputed ones.
pub struct TransferIndexCache {
    transfers: Arc<TransfersByStop>,
    strategy: TransferIndexStrategy,
    indexes: MokaCache<TransferRequest, Arc<PrecomputedTransferIndex>>,
}

impl TransferIndexCache {
    /// Create a cache holding at most `max_capacity` precomputed indexes.
    pub fn new(
        transfers: Arc<TransfersByStop>,
        strategy: TransferIndexStrategy,
        max_capacity: u64,
    ) -> Self {
        Self {
            transfers,
            strategy,
            indexes: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// The transfer index for a request.
    ///
    /// On-demand and uncached indexes are created fresh for every call.
    pub fn get(&self, request: &TransferRequest) -> Arc<dyn RaptorTransferIndex> {
        match self.strategy {
            TransferIndexStrategy::Precomputed => {
                self.indexes.get_with_by_ref(request, || {
                    debug!(?request, "building transfer index");
                    Arc::new(PrecomputedTransferIndex::create(&self.transfers, request))
                })
            }
            TransferIndexStrategy::OnDemand => Arc::new(OnDemandTransferIndex::new(
                self.transfers.clone(),
                request.clone(),
            )),
            TransferIndexStrategy::Uncached => Arc::new(UncachedTransferIndex::new(
                self.transfers.clone(),
                request.clone(),
            )),
        }
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.indexes.run_pending_tasks();
        self.indexes.entry_count()
    }
}
