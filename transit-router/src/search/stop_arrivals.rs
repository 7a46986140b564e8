//! The Pareto set of arrivals at every stop.

use crate::domain::StopIndex;
use crate::paretoset::ParetoSet;

use super::{
    ArrivalArena, ArrivalId, ArrivalKey, DestinationArrivalPaths, EgressPaths, SearchContext,
    StopArrivalComparator,
};

/// Arrivals per stop, the stops touched since the last marker, and the
/// link from egress stops to the destination.
pub struct McStopArrivals {
    sets: Vec<Option<ParetoSet<ArrivalKey, StopArrivalComparator>>>,
    comparator: StopArrivalComparator,
    touched: Vec<StopIndex>,
    is_touched: Vec<bool>,
    egress: EgressPaths,
    destination: DestinationArrivalPaths,
}

impl McStopArrivals {
    pub fn new(ctx: &SearchContext<'_>) -> Self {
        let n = ctx.data.number_of_stops();
        let include_c2 = ctx.pass_through.is_enabled();
        Self {
            sets: (0..n).map(|_| None).collect(),
            comparator: StopArrivalComparator::new(ctx.calculator.is_forward(), include_c2),
            touched: Vec::new(),
            is_touched: vec![false; n],
            egress: EgressPaths::new(ctx),
            destination: DestinationArrivalPaths::new(include_c2),
        }
    }

    /// Offer an arrival to its stop. Accepted arrivals at egress stops are
    /// passed on to the destination.
    pub fn add_stop_arrival(
        &mut self,
        ctx: &SearchContext<'_>,
        arena: &ArrivalArena,
        id: ArrivalId,
    ) -> bool {
        let arrival = arena.get(id);
        let stop = arrival.stop;
        let comparator = self.comparator;
        let set = self.sets[stop.index()].get_or_insert_with(|| ParetoSet::new(comparator));
        if !set.add(ArrivalKey::new(id, arrival)).is_accepted() {
            return false;
        }

        if !self.is_touched[stop.index()] {
            self.is_touched[stop.index()] = true;
            self.touched.push(stop);
        }

        if self.egress.is_egress_stop(stop) {
            for egress in self.egress.usable_after(ctx, stop, arrival.arrived_on_board()) {
                self.destination.add(ctx, id, arrival, egress);
            }
        }
        true
    }

    /// Whether an arrival with these criteria would be accepted at `stop`.
    pub fn qualify(&self, stop: StopIndex, key: &ArrivalKey) -> bool {
        match &self.sets[stop.index()] {
            Some(set) => set.qualify(key),
            None => true,
        }
    }

    /// Arrivals added to `stop` since its marker was last set.
    pub fn arrivals_after_marker(&self, stop: StopIndex) -> &[ArrivalKey] {
        match &self.sets[stop.index()] {
            Some(set) => set.elements_after_marker(),
            None => &[],
        }
    }

    /// Set the marker at the end of every touched stop's set and start a new
    /// touched list.
    pub fn clear_touched_stops_and_set_stop_markers(&mut self) {
        for stop in self.touched.drain(..) {
            self.is_touched[stop.index()] = false;
            if let Some(set) = &mut self.sets[stop.index()] {
                set.mark_at_end_of_set();
            }
        }
    }

    pub fn touched_stops(&self) -> &[StopIndex] {
        &self.touched
    }

    pub fn is_new_round_available(&self) -> bool {
        !self.touched.is_empty()
    }

    pub fn destination(&self) -> &DestinationArrivalPaths {
        &self.destination
    }

    pub fn destination_mut(&mut self) -> &mut DestinationArrivalPaths {
        &mut self.destination
    }

    /// Number of arrivals currently held across all stops.
    pub fn size(&self) -> usize {
        self.sets.iter().flatten().map(ParetoSet::len).sum()
    }
}
