//! Multi-criteria Range-RAPTOR transit router.
//!
//! Given a per-day transit network, a departure (or arrival) window and
//! precomputed access and egress paths, the router finds every
//! Pareto-optimal journey over arrival time, number of transfers,
//! generalized cost and, optionally, progress through ordered
//! pass-through points.
//!
//! Street transfers between stops are turned into search transfers by the
//! [`transfer`] layer, which caches one index per distinct set of street
//! parameters.

pub mod config;
pub mod domain;
pub mod io;
pub mod paretoset;
pub mod search;
pub mod transfer;
pub mod transit;
pub mod util;
