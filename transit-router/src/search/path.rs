//! Journeys as legs in travel order.

use std::fmt;

use crate::domain::{DurationFmt, StopIndex, TimeFmt, TripRef, to_seconds};
use crate::transit::TransitData;

use super::{ArrivalArena, ArrivalKind, DestinationArrival, SearchContext, StopArrival};

/// One leg of a journey. Times are real times, whatever the search
/// direction was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLeg {
    Access {
        to_stop: StopIndex,
        from_time: i32,
        to_time: i32,
        c1: i32,
    },
    Transit {
        trip: TripRef,
        from_stop: StopIndex,
        from_pos: usize,
        to_stop: StopIndex,
        to_pos: usize,
        from_time: i32,
        to_time: i32,
        c1: i32,
    },
    Transfer {
        from_stop: StopIndex,
        to_stop: StopIndex,
        from_time: i32,
        to_time: i32,
        c1: i32,
    },
    Egress {
        from_stop: StopIndex,
        from_time: i32,
        to_time: i32,
        c1: i32,
    },
}

impl PathLeg {
    pub fn from_time(&self) -> i32 {
        match *self {
            Self::Access { from_time, .. }
            | Self::Transit { from_time, .. }
            | Self::Transfer { from_time, .. }
            | Self::Egress { from_time, .. } => from_time,
        }
    }

    pub fn to_time(&self) -> i32 {
        match *self {
            Self::Access { to_time, .. }
            | Self::Transit { to_time, .. }
            | Self::Transfer { to_time, .. }
            | Self::Egress { to_time, .. } => to_time,
        }
    }

    pub fn c1(&self) -> i32 {
        match *self {
            Self::Access { c1, .. }
            | Self::Transit { c1, .. }
            | Self::Transfer { c1, .. }
            | Self::Egress { c1, .. } => c1,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, Self::Transit { .. })
    }
}

/// A Pareto-optimal journey from origin to destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    legs: Vec<PathLeg>,
    start_time: i32,
    end_time: i32,
    number_of_transfers: u32,
    c1: i32,
    c2: i32,
}

impl Path {
    pub(crate) fn new(
        legs: Vec<PathLeg>,
        start_time: i32,
        end_time: i32,
        number_of_transfers: u32,
        c1: i32,
        c2: i32,
    ) -> Self {
        Self {
            legs,
            start_time,
            end_time,
            number_of_transfers,
            c1,
            c2,
        }
    }

    pub fn legs(&self) -> &[PathLeg] {
        &self.legs
    }

    pub fn transit_legs(&self) -> impl Iterator<Item = &PathLeg> {
        self.legs.iter().filter(|leg| leg.is_transit())
    }

    pub fn start_time(&self) -> i32 {
        self.start_time
    }

    pub fn end_time(&self) -> i32 {
        self.end_time
    }

    pub fn duration(&self) -> i32 {
        self.end_time - self.start_time
    }

    pub fn number_of_transfers(&self) -> u32 {
        self.number_of_transfers
    }

    /// Number of transit legs plus rides inside access and egress.
    pub fn rounds(&self) -> u32 {
        self.number_of_transfers + 1
    }

    pub fn c1(&self) -> i32 {
        self.c1
    }

    pub fn c2(&self) -> i32 {
        self.c2
    }

    /// A one-line description using stop and pattern names.
    pub fn describe<'p>(&'p self, data: &'p TransitData) -> PathDescription<'p> {
        PathDescription { path: self, data }
    }
}

/// Display adapter for [`Path::describe`], e.g.
/// `Walk 1m ~ A ~ R1 08:00:00 08:20:00 ~ C ~ Walk 2m [08:00:00 08:22:00 22m Tx0 C₁1_900]`.
pub struct PathDescription<'p> {
    path: &'p Path,
    data: &'p TransitData,
}

impl fmt::Display for PathDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stop = |s: StopIndex| self.data.stop_name(s);
        for (i, leg) in self.path.legs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ~ ")?;
            }
            match *leg {
                PathLeg::Access {
                    to_stop,
                    from_time,
                    to_time,
                    ..
                } => write!(f, "Walk {} ~ {}", DurationFmt(to_time - from_time), stop(to_stop))?,
                PathLeg::Transit {
                    trip,
                    from_time,
                    to_time,
                    to_stop,
                    ..
                } => write!(
                    f,
                    "{} {} {} ~ {}",
                    self.data.route(trip.pattern).pattern.name(),
                    TimeFmt(from_time),
                    TimeFmt(to_time),
                    stop(to_stop)
                )?,
                PathLeg::Transfer {
                    to_stop,
                    from_time,
                    to_time,
                    ..
                } => write!(f, "Walk {} ~ {}", DurationFmt(to_time - from_time), stop(to_stop))?,
                PathLeg::Egress {
                    from_time, to_time, ..
                } => write!(f, "Walk {}", DurationFmt(to_time - from_time))?,
            }
        }
        write!(
            f,
            " [{} {} {} Tx{} C₁{}]",
            TimeFmt(self.path.start_time),
            TimeFmt(self.path.end_time),
            DurationFmt(self.path.duration()),
            self.path.number_of_transfers,
            to_seconds(self.path.c1)
        )
    }
}

/// Build the legs of a destination arrival by walking its arrival chain.
pub fn map_path(ctx: &SearchContext<'_>, arena: &ArrivalArena, dest: &DestinationArrival) -> Path {
    let chain: Vec<&StopArrival> = arena.chain(dest.arrival).collect();
    let last = chain[0];
    let root = chain[chain.len() - 1];

    let mut legs = Vec::with_capacity(chain.len() + 1);
    if ctx.calculator.is_forward() {
        legs.push(PathLeg::Access {
            to_stop: root.stop,
            from_time: root.origin_time,
            to_time: root.arrival_time,
            c1: root.c1,
        });
        for pair in chain.windows(2).rev() {
            let (arrival, previous) = (pair[0], pair[1]);
            legs.push(forward_leg(arrival, previous));
        }
        legs.push(PathLeg::Egress {
            from_stop: last.stop,
            from_time: dest.departure_time,
            to_time: dest.arrival_time,
            c1: dest.c1 - last.c1,
        });
    } else {
        legs.push(PathLeg::Access {
            to_stop: last.stop,
            from_time: dest.arrival_time,
            to_time: dest.departure_time,
            c1: dest.c1 - last.c1,
        });
        for pair in chain.windows(2) {
            let (arrival, previous) = (pair[0], pair[1]);
            legs.push(reverse_leg(arrival, previous));
        }
        legs.push(PathLeg::Egress {
            from_stop: root.stop,
            from_time: root.arrival_time,
            to_time: root.origin_time,
            c1: root.c1,
        });
    }

    Path::new(
        legs,
        dest.start_time,
        dest.end_time,
        dest.number_of_transfers,
        dest.c1,
        dest.c2,
    )
}

/// Leg reaching `arrival` from `previous` in a forward search.
fn forward_leg(arrival: &StopArrival, previous: &StopArrival) -> PathLeg {
    let c1 = arrival.c1 - previous.c1;
    match arrival.kind {
        ArrivalKind::Transit {
            trip,
            board_stop,
            board_pos,
            board_time,
            alight_pos,
            alight_time,
        } => PathLeg::Transit {
            trip,
            from_stop: board_stop,
            from_pos: board_pos,
            to_stop: arrival.stop,
            to_pos: alight_pos,
            from_time: board_time,
            to_time: alight_time,
            c1,
        },
        ArrivalKind::Transfer { .. } | ArrivalKind::Access { .. } => PathLeg::Transfer {
            from_stop: previous.stop,
            to_stop: arrival.stop,
            from_time: previous.arrival_time,
            to_time: arrival.arrival_time,
            c1,
        },
    }
}

/// Leg reaching `arrival` from `previous` in a reverse search, turned
/// around into travel order.
fn reverse_leg(arrival: &StopArrival, previous: &StopArrival) -> PathLeg {
    let c1 = arrival.c1 - previous.c1;
    match arrival.kind {
        ArrivalKind::Transit {
            trip,
            board_stop,
            board_pos,
            board_time,
            alight_pos,
            alight_time,
        } => PathLeg::Transit {
            trip,
            from_stop: arrival.stop,
            from_pos: alight_pos,
            to_stop: board_stop,
            to_pos: board_pos,
            from_time: alight_time,
            to_time: board_time,
            c1,
        },
        ArrivalKind::Transfer { .. } | ArrivalKind::Access { .. } => PathLeg::Transfer {
            from_stop: arrival.stop,
            to_stop: previous.stop,
            from_time: arrival.arrival_time,
            to_time: previous.arrival_time,
            c1,
        },
    }
}
