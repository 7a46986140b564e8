//! Domain types for the transit router.
//!
//! This module contains the small value types shared by the schedule, the
//! transfer layer and the search: dense indexes, service-day times and
//! generalized-cost units. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod cost;
mod error;
mod index;
mod time;

pub use cost::{COST_NOT_SET, COST_UNITS_PER_SECOND, to_router_cost, to_router_factor, to_seconds};
pub use error::DomainError;
pub use index::{PatternIndex, StopIndex, TripRef};
pub use time::{DurationFmt, MAX_LEG_DURATION, TIME_NOT_SET, TimeError, TimeFmt, parse_time, to_datetime};
