//! Transfers between stops as the search consumes them.

mod cache;
mod index;
mod request;
mod street;

pub use cache::TransferIndexCache;
pub use index::{
    OnDemandTransferIndex, PrecomputedTransferIndex, RaptorTransferIndex, TransferIndexError,
    TransferIndexStrategy, TransfersByStop, UncachedTransferIndex,
};
pub use request::{TransferMode, TransferRequest};
pub use street::{
    MAX_TRANSFER_COST, RaptorTransfer, StreetEdge, StreetPermission, Transfer, clamp_transfer_cost,
};
