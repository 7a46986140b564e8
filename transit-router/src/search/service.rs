//! Public entry point for journey searches.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::config::RouterConfig;
use crate::transfer::{TransferIndexCache, TransfersByStop};
use crate::transit::TransitData;

use super::rank::rank_paths;
use super::{Path, RangeRaptorWorker, SearchContext, SearchError, SearchRequest};

/// Result of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Pareto-optimal paths, ranked best-first.
    pub paths: Vec<Path>,

    /// Number of Range-RAPTOR iterations run.
    pub iterations: usize,

    /// Highest round reached in any iteration.
    pub max_round: u32,

    /// Number of stop arrivals created during the search.
    pub arrivals_created: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            paths: Vec::new(),
            iterations: 0,
            max_round: 0,
            arrivals_created: 0,
        }
    }
}

/// Runs searches against one network's transfers.
///
/// The service owns the transfer-index cache, so repeated requests with the
/// same street parameters share one precomputed index.
pub struct RaptorService {
    config: RouterConfig,
    transfer_indexes: TransferIndexCache,
}

impl RaptorService {
    /// Create a service for the given configuration and transfer table.
    pub fn new(config: RouterConfig, transfers: TransfersByStop) -> Self {
        let transfers =
            Arc::new(transfers.with_cost_log_quiet_period(config.cost_log_quiet_period()));
        let transfer_indexes = TransferIndexCache::new(
            transfers,
            config.transfer_index_strategy,
            config.transfer_cache_size,
        );
        Self {
            config,
            transfer_indexes,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn transfer_indexes(&self) -> &TransferIndexCache {
        &self.transfer_indexes
    }

    /// Search for journeys.
    ///
    /// All request validation happens before the first iteration; once the
    /// search is running it cannot fail.
    pub fn route(
        &self,
        data: &TransitData,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchError> {
        let transfers = self.transfer_indexes.get(&request.transfer);
        let ctx = SearchContext::new(data, transfers.as_ref(), request, &self.config)?;

        let result = RangeRaptorWorker::new(&ctx).route();
        let paths = rank_paths(result.paths);

        debug!(
            direction = ?request.direction,
            paths = paths.len(),
            iterations = result.iterations,
            max_round = result.max_round,
            "search complete"
        );

        Ok(SearchResult {
            paths,
            iterations: result.iterations,
            max_round: result.max_round,
            arrivals_created: result.arrivals_created,
        })
    }

    /// Run independent searches in parallel.
    ///
    /// Results are returned in request order.
    pub fn route_all(
        &self,
        data: &TransitData,
        requests: &[SearchRequest],
    ) -> Vec<Result<SearchResult, SearchError>> {
        requests
            .par_iter()
            .map(|request| self.route(data, request))
            .collect()
    }
}
