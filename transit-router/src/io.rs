//! JSON input for the command line router.
//!
//! Files refer to stops, patterns and trips by name and to times as
//! `HH:MM[:SS]` strings; loading resolves them into the indexed types the
//! search works with.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::RouterConfig;
use crate::domain::{
    DomainError, PatternIndex, StopIndex, TimeError, TripRef, parse_time, to_router_cost,
};
use crate::search::{
    AccessEgress, CostParams, SearchDirection, SearchError, SearchRequest, SlackParams,
};
use crate::transfer::{
    StreetEdge, Transfer, TransferIndexError, TransferRequest, TransfersByStop,
};
use crate::transit::{
    ConstrainedTransfer, FrequencyEntry, ScheduleError, TransferConstraintKind, TransitData,
    TransitDataBuilder, TripPattern, TripSchedule,
};

/// Error loading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid service date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("stop {0:?} is defined twice")]
    DuplicateStop(String),

    #[error("unknown stop {0:?}")]
    UnknownStop(String),

    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),

    #[error("unknown trip {trip:?} in pattern {pattern:?}")]
    UnknownTrip { pattern: String, trip: String },

    #[error("pattern {pattern:?} has no stop position {position}")]
    InvalidStopPosition { pattern: String, position: usize },

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    TransferIndex(#[from] TransferIndexError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A per-day network: stops, patterns with their trips, street transfers
/// and constrained transfers.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkFile {
    pub service_date: String,
    pub stops: Vec<String>,
    pub patterns: Vec<PatternDto>,
    #[serde(default)]
    pub transfers: Vec<TransferDto>,
    #[serde(default)]
    pub constrained_transfers: Vec<ConstrainedTransferDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternDto {
    pub name: String,
    pub stops: Vec<String>,
    #[serde(default)]
    pub slack_index: usize,
    /// Stop positions where boarding is not allowed.
    #[serde(default)]
    pub no_boarding: Vec<usize>,
    /// Stop positions where alighting is not allowed.
    #[serde(default)]
    pub no_alighting: Vec<usize>,
    #[serde(default)]
    pub trips: Vec<TripDto>,
    #[serde(default)]
    pub frequencies: Vec<FrequencyDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripDto {
    pub id: String,
    pub arrivals: Vec<String>,
    /// Defaults to the arrival times.
    #[serde(default)]
    pub departures: Option<Vec<String>>,
    #[serde(default)]
    pub transit_reluctance_index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyDto {
    pub template: TripDto,
    pub start: String,
    pub end: String,
    pub headway_seconds: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferDto {
    pub from: String,
    pub to: String,
    pub distance_meters: i32,
    #[serde(default)]
    pub edges: Option<Vec<StreetEdge>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstrainedTransferDto {
    pub from_pattern: String,
    pub from_trip: String,
    pub from_stop: String,
    pub to_pattern: String,
    pub to_trip: String,
    pub to_stop: String,
    pub kind: TransferConstraintKind,
}

/// Stop names resolved while a network is built.
struct Names {
    stops: HashMap<String, StopIndex>,
    patterns: HashMap<String, PatternIndex>,
}

impl Names {
    fn stop(&self, name: &str) -> Result<StopIndex, LoadError> {
        self.stops
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownStop(name.to_string()))
    }

    fn pattern(&self, name: &str) -> Result<PatternIndex, LoadError> {
        self.patterns
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownPattern(name.to_string()))
    }

    fn trip(
        &self,
        builder: &TransitDataBuilder,
        pattern: &str,
        trip: &str,
    ) -> Result<TripRef, LoadError> {
        let index = self.pattern(pattern)?;
        let position = builder
            .trip_index(index, trip)
            .ok_or_else(|| LoadError::UnknownTrip {
                pattern: pattern.to_string(),
                trip: trip.to_string(),
            })?;
        Ok(TripRef::new(index, position))
    }
}

impl NetworkFile {
    /// Build the schedule and the transfer table.
    pub fn build(self) -> Result<(TransitData, TransfersByStop), LoadError> {
        let service_date = NaiveDate::parse_from_str(&self.service_date, "%Y-%m-%d")
            .map_err(|_| LoadError::InvalidDate(self.service_date.clone()))?;
        let mut builder = TransitData::builder(service_date);
        let mut names = Names {
            stops: HashMap::new(),
            patterns: HashMap::new(),
        };

        for name in self.stops {
            if names.stops.contains_key(&name) {
                return Err(LoadError::DuplicateStop(name));
            }
            let stop = builder.add_stop(name.clone());
            names.stops.insert(name, stop);
        }

        for dto in self.patterns {
            let name = dto.name.clone();
            let (pattern, trips, frequencies) = dto.into_parts(&names)?;
            let index = builder.add_route(pattern, trips, &frequencies)?;
            names.patterns.insert(name, index);
        }

        for dto in &self.constrained_transfers {
            let transfer = ConstrainedTransfer {
                from_trip: names.trip(&builder, &dto.from_pattern, &dto.from_trip)?,
                from_stop: names.stop(&dto.from_stop)?,
                to_trip: names.trip(&builder, &dto.to_pattern, &dto.to_trip)?,
                to_stop: names.stop(&dto.to_stop)?,
                kind: dto.kind,
            };
            builder.add_constrained_transfer(transfer)?;
        }

        let data = builder.build();
        let mut transfers = vec![Vec::new(); data.number_of_stops()];
        for dto in self.transfers {
            let from = names.stop(&dto.from)?;
            let to = names.stop(&dto.to)?;
            transfers[from.index()].push(Transfer::new(to, dto.distance_meters, dto.edges)?);
        }
        let transfers = TransfersByStop::new(transfers, data.number_of_stops())?;

        debug!(
            stops = data.number_of_stops(),
            patterns = data.routes().len(),
            constrained_transfers = data.constrained_transfers().len(),
            "network loaded"
        );
        Ok((data, transfers))
    }
}

impl PatternDto {
    fn into_parts(
        self,
        names: &Names,
    ) -> Result<(TripPattern, Vec<TripSchedule>, Vec<FrequencyEntry>), LoadError> {
        let stops = self
            .stops
            .iter()
            .map(|s| names.stop(s))
            .collect::<Result<Vec<_>, _>>()?;
        let number_of_stops = stops.len();

        let mut pattern =
            TripPattern::new(self.name.clone(), stops)?.with_slack_index(self.slack_index);
        for &position in self.no_boarding.iter().chain(&self.no_alighting) {
            if position >= number_of_stops {
                return Err(LoadError::InvalidStopPosition {
                    pattern: self.name,
                    position,
                });
            }
        }
        for &position in &self.no_boarding {
            pattern = pattern.no_boarding_at(position);
        }
        for &position in &self.no_alighting {
            pattern = pattern.no_alighting_at(position);
        }

        let trips = self
            .trips
            .into_iter()
            .map(TripDto::into_schedule)
            .collect::<Result<Vec<_>, _>>()?;
        let frequencies = self
            .frequencies
            .into_iter()
            .map(FrequencyDto::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((pattern, trips, frequencies))
    }
}

impl TripDto {
    fn into_schedule(self) -> Result<TripSchedule, LoadError> {
        let arrivals = parse_times(&self.arrivals)?;
        let departures = match &self.departures {
            Some(times) => parse_times(times)?,
            None => arrivals.clone(),
        };
        Ok(TripSchedule::new(self.id, arrivals, departures)?
            .with_transit_reluctance_index(self.transit_reluctance_index))
    }
}

impl FrequencyDto {
    fn into_entry(self) -> Result<FrequencyEntry, LoadError> {
        Ok(FrequencyEntry {
            template: self.template.into_schedule()?,
            start_time: parse_time(&self.start)?,
            end_time: parse_time(&self.end)?,
            headway: self.headway_seconds,
        })
    }
}

fn parse_times(times: &[String]) -> Result<Vec<i32>, TimeError> {
    times.iter().map(|t| parse_time(t)).collect()
}

/// A search request with stops referred to by name.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestFile {
    #[serde(default)]
    pub direction: SearchDirection,
    #[serde(default)]
    pub earliest_departure_time: Option<String>,
    #[serde(default)]
    pub latest_arrival_time: Option<String>,
    #[serde(default)]
    pub search_window_seconds: Option<i32>,
    #[serde(default)]
    pub max_number_of_transfers: Option<usize>,
    #[serde(default)]
    pub max_journey_duration_seconds: Option<i32>,
    pub access: Vec<AccessEgressDto>,
    pub egress: Vec<AccessEgressDto>,
    #[serde(default)]
    pub pass_through_points: Vec<Vec<String>>,
    #[serde(default)]
    pub slack: SlackParams,
    #[serde(default)]
    pub cost: CostParams,
    #[serde(default)]
    pub transfer: TransferRequest,
    #[serde(default)]
    pub use_constrained_transfers: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessEgressDto {
    pub stop: String,
    pub duration_seconds: i32,
    /// Generalized cost in seconds; defaults to the duration.
    #[serde(default)]
    pub cost_seconds: Option<i32>,
    #[serde(default)]
    pub rides: u32,
    #[serde(default)]
    pub on_board: bool,
    #[serde(default)]
    pub time_penalty_seconds: Option<i32>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHoursDto>,
}

/// Times between which an access or egress path may start.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHoursDto {
    pub open: String,
    pub close: String,
}

impl AccessEgressDto {
    fn resolve(&self, data: &TransitData) -> Result<AccessEgress, LoadError> {
        let stop = find_stop(data, &self.stop)?;
        let cost = self.cost_seconds.unwrap_or(self.duration_seconds);
        let mut path = AccessEgress::new(stop, self.duration_seconds, to_router_cost(cost))?
            .with_rides(self.rides, self.on_board);
        if let Some(penalty) = self.time_penalty_seconds {
            path = path.with_time_penalty(penalty)?;
        }
        if let Some(hours) = &self.opening_hours {
            path = path.with_opening_hours(parse_time(&hours.open)?, parse_time(&hours.close)?)?;
        }
        Ok(path)
    }
}

fn find_stop(data: &TransitData, name: &str) -> Result<StopIndex, LoadError> {
    data.find_stop(name)
        .ok_or_else(|| LoadError::UnknownStop(name.to_string()))
}

impl RequestFile {
    /// Resolve stop names against `data`.
    pub fn into_request(self, data: &TransitData) -> Result<SearchRequest, LoadError> {
        let mut request = SearchRequest::depart_after(0);
        request.direction = self.direction;
        request.earliest_departure_time = self
            .earliest_departure_time
            .as_deref()
            .map(parse_time)
            .transpose()?;
        request.latest_arrival_time = self
            .latest_arrival_time
            .as_deref()
            .map(parse_time)
            .transpose()?;
        if let Some(window) = self.search_window_seconds {
            request.search_window = window;
        }
        if let Some(max) = self.max_number_of_transfers {
            request.max_number_of_transfers = max;
        }
        if let Some(duration) = self.max_journey_duration_seconds {
            request.max_journey_duration = duration;
        }
        if let Some(enabled) = self.use_constrained_transfers {
            request.use_constrained_transfers = enabled;
        }

        request.access = self
            .access
            .iter()
            .map(|a| a.resolve(data))
            .collect::<Result<Vec<_>, _>>()?;
        request.egress = self
            .egress
            .iter()
            .map(|e| e.resolve(data))
            .collect::<Result<Vec<_>, _>>()?;
        request.pass_through_points = self
            .pass_through_points
            .iter()
            .map(|point| {
                point
                    .iter()
                    .map(|s| find_stop(data, s))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        request.slack = self.slack;
        request.cost = self.cost;
        request.transfer = self.transfer;
        Ok(request)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a network file.
pub fn load_network(path: &Path) -> Result<(TransitData, TransfersByStop), LoadError> {
    read_json::<NetworkFile>(path)?.build()
}

/// Load a request file for a loaded network.
pub fn load_request(path: &Path, data: &TransitData) -> Result<SearchRequest, LoadError> {
    read_json::<RequestFile>(path)?.into_request(data)
}

/// Load a router configuration; missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<RouterConfig, LoadError> {
    read_json(path)
}
