//! Multi-criteria Range-RAPTOR search.
//!
//! A search runs in rounds: round `n` finds every Pareto-optimal way of
//! reaching each stop using `n` transit rides. Each stop keeps a Pareto set
//! of arrivals over arrival time, number of transfers, generalized cost and
//! (when pass-through points are requested) progress through those points.
//! The range variant repeats the search for every minute of the departure
//! window, latest first, keeping state between iterations so that later
//! departures prune earlier ones.
//!
//! Forward searches depart after a given time; reverse searches arrive
//! before a given time and run backwards through the timetable. The
//! `TransitCalculator` hides the difference from the rest of the search.

mod access_egress;
mod arrival;
mod calculator;
mod context;
mod cost;
mod destination;
mod error;
mod pass_through;
mod path;
mod rank;
mod request;
mod ride;
mod service;
mod slack;
mod stop_arrivals;
mod strategy;
mod worker;
mod worker_state;


pub use access_egress::{AccessEgress, OpeningHours};
pub use error::SearchError;
pub use path::{Path, PathDescription, PathLeg};
pub use rank::rank_paths;
pub use request::{CostParams, SearchDirection, SearchRequest, SlackParams};
pub use service::{RaptorService, SearchResult};

pub(crate) use arrival::{
    ArrivalArena, ArrivalId, ArrivalKey, ArrivalKind, StopArrival, StopArrivalComparator,
};
pub(crate) use calculator::TransitCalculator;
pub(crate) use context::SearchContext;
pub(crate) use cost::CostCalculator;
pub(crate) use destination::{DestinationArrival, DestinationArrivalPaths, EgressPaths};
pub(crate) use pass_through::PassThroughPoints;
pub(crate) use path::map_path;
pub(crate) use ride::{PatternRide, PatternRideComparator};
pub(crate) use slack::SlackProvider;
pub(crate) use stop_arrivals::McStopArrivals;
pub(crate) use strategy::MultiCriteriaRoutingStrategy;
pub(crate) use worker::RangeRaptorWorker;
pub(crate) use worker_state::McRangeRaptorWorkerState;
