//! Everything fixed for the duration of one search.

use tracing::debug;

use crate::config::RouterConfig;
use crate::transfer::RaptorTransferIndex;
use crate::transit::TransitData;

use super::{
    AccessEgress, CostCalculator, PassThroughPoints, SearchDirection, SearchError, SearchRequest,
    SlackProvider, TransitCalculator,
};

/// The validated request and the network, seen from the search direction.
///
/// In a reverse search `access` holds the request's egress paths and
/// `egress` its access paths.
pub struct SearchContext<'a> {
    pub data: &'a TransitData,
    pub transfers: &'a dyn RaptorTransferIndex,
    pub calculator: TransitCalculator,
    pub cost: CostCalculator,
    pub slack: SlackProvider,
    pub pass_through: PassThroughPoints,
    pub access: Vec<AccessEgress>,
    pub egress: Vec<AccessEgress>,
    pub max_number_of_transfers: usize,
    pub max_additional_transfers: usize,
    pub use_constrained_transfers: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        data: &'a TransitData,
        transfers: &'a dyn RaptorTransferIndex,
        request: &SearchRequest,
        config: &RouterConfig,
    ) -> Result<Self, SearchError> {
        let number_of_stops = data.number_of_stops();
        if transfers.number_of_stops() != number_of_stops {
            return Err(SearchError::TransferIndexMismatch {
                expected: number_of_stops,
                actual: transfers.number_of_stops(),
            });
        }
        if request.search_window < 0 {
            return Err(SearchError::InvalidSearchWindow(request.search_window));
        }
        if request.access.is_empty() {
            return Err(SearchError::NoAccess);
        }
        if request.egress.is_empty() {
            return Err(SearchError::NoEgress);
        }
        if let Some(path) = request
            .access
            .iter()
            .chain(&request.egress)
            .find(|p| p.stop().index() >= number_of_stops)
        {
            return Err(SearchError::UnknownStop(path.stop()));
        }

        let window_and_duration = request.search_window + request.max_journey_duration;
        let (search_start, time_limit, access, egress) = match request.direction {
            SearchDirection::Forward => {
                let edt = request
                    .earliest_departure_time
                    .ok_or(SearchError::MissingDepartureTime)?;
                let limit = request
                    .latest_arrival_time
                    .unwrap_or(edt + window_and_duration);
                (edt, limit, request.access.clone(), request.egress.clone())
            }
            SearchDirection::Reverse => {
                let lat = request
                    .latest_arrival_time
                    .ok_or(SearchError::MissingArrivalTime)?;
                let limit = request
                    .earliest_departure_time
                    .unwrap_or(lat - window_and_duration);
                (lat, limit, request.egress.clone(), request.access.clone())
            }
        };

        let pass_through = PassThroughPoints::new(
            &request.pass_through_points,
            request.direction,
            number_of_stops,
        )?;

        debug!(
            direction = ?request.direction,
            search_start,
            time_limit,
            access = access.len(),
            egress = egress.len(),
            pass_through_points = request.pass_through_points.len(),
            "search set up"
        );

        Ok(Self {
            data,
            transfers,
            calculator: TransitCalculator::new(
                request.direction,
                search_start,
                request.search_window,
                config.iteration_step_seconds,
                time_limit,
            ),
            cost: CostCalculator::new(&request.cost),
            slack: SlackProvider::new(&request.slack, request.direction),
            pass_through,
            access,
            egress,
            max_number_of_transfers: request.max_number_of_transfers,
            max_additional_transfers: config.max_additional_transfers,
            use_constrained_transfers: request.use_constrained_transfers,
        })
    }

    /// Highest number of rides used by any access path.
    pub fn max_access_rides(&self) -> u32 {
        self.access
            .iter()
            .map(AccessEgress::number_of_rides)
            .max()
            .unwrap_or(0)
    }
}
