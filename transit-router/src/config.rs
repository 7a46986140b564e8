//! Router configuration shared by all searches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transfer::TransferIndexStrategy;

/// Configuration parameters for the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// How transfer indexes are built and cached.
    pub transfer_index_strategy: TransferIndexStrategy,

    /// Maximum number of precomputed transfer indexes kept in memory.
    pub transfer_cache_size: u64,

    /// Distance between Range-RAPTOR iterations (seconds).
    pub iteration_step_seconds: i32,

    /// Extra rounds searched after the destination is first reached.
    pub max_additional_transfers: usize,

    /// Minimum time between two warnings about clamped or dropped
    /// transfers (seconds).
    pub cost_log_quiet_period_seconds: u64,
}

impl RouterConfig {
    /// Returns the cost log quiet period as a Duration.
    pub fn cost_log_quiet_period(&self) -> Duration {
        Duration::from_secs(self.cost_log_quiet_period_seconds)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            transfer_index_strategy: TransferIndexStrategy::Precomputed,
            transfer_cache_size: 25,
            iteration_step_seconds: 60,
            max_additional_transfers: 5,
            cost_log_quiet_period_seconds: 1,
        }
    }
}
