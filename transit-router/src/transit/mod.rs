//! Per-day transit schedule.
//!
//! Stops, trip patterns, timetables and constrained transfers for one service
//! date. The search only reads from this module.

mod constraint;
mod data;
mod error;
mod pattern;
mod trip;

pub use constraint::{ConstrainedTransfer, ConstrainedTransfers, TransferConstraintKind};
pub use data::{Route, TransitData, TransitDataBuilder};
pub use error::ScheduleError;
pub use pattern::{Timetable, TripPattern};
pub use trip::{FrequencyEntry, TripSchedule};
