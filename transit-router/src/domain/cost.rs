//! Generalized-cost units.
//!
//! The router works with integer costs in centi-seconds: one second of
//! "generalized cost" is `100`. Reluctance factors such as 1.75 therefore
//! become exact integers (175) and the hot path never touches floating point.

/// Number of cost units per second of generalized cost.
pub const COST_UNITS_PER_SECOND: i32 = 100;

/// A cost value that is never reached by a real journey.
pub const COST_NOT_SET: i32 = -1;

/// Convert a cost in seconds to router cost units.
///
/// # Examples
///
/// ```
/// use transit_router::domain::to_router_cost;
///
/// assert_eq!(to_router_cost(600), 60_000);
/// ```
pub fn to_router_cost(seconds: i32) -> i32 {
    seconds.saturating_mul(COST_UNITS_PER_SECOND)
}

/// Convert a reluctance factor (e.g. 1.75) into an integer cost factor (175).
pub fn to_router_factor(reluctance: f64) -> i32 {
    (reluctance * f64::from(COST_UNITS_PER_SECOND)).round() as i32
}

/// Convert router cost units back to whole seconds, rounding to nearest.
pub fn to_seconds(cost: i32) -> i32 {
    (cost + COST_UNITS_PER_SECOND / 2).div_euclid(COST_UNITS_PER_SECOND)
}
