//! Street parameters a transfer index is built for.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Street mode used between stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    #[default]
    Walk,
    Bike,
    Car,
}

/// Everything that changes the duration or cost of a transfer.
///
/// Two requests that compare equal produce identical transfer indexes, so
/// this is the key of the transfer index cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferRequest {
    pub mode: TransferMode,
    /// Walk speed in m/s.
    pub walk_speed: OrderedFloat<f64>,
    /// Bike speed in m/s.
    pub bike_speed: OrderedFloat<f64>,
    /// Car speed in m/s.
    pub car_speed: OrderedFloat<f64>,
    /// Cost per second spent on the street, relative to riding transit.
    pub reluctance: OrderedFloat<f64>,
    pub wheelchair: bool,
    /// Extra reluctance on edges not wheelchair accessible, when
    /// `wheelchair` is set.
    pub inaccessible_street_reluctance: OrderedFloat<f64>,
}

impl TransferRequest {
    /// Speed in m/s for the requested mode.
    pub fn speed(&self) -> f64 {
        match self.mode {
            TransferMode::Walk => self.walk_speed.0,
            TransferMode::Bike => self.bike_speed.0,
            TransferMode::Car => self.car_speed.0,
        }
    }
}

impl Default for TransferRequest {
    fn default() -> Self {
        Self {
            mode: TransferMode::Walk,
            walk_speed: OrderedFloat(1.33),
            bike_speed: OrderedFloat(5.0),
            car_speed: OrderedFloat(11.2),
            reluctance: OrderedFloat(2.0),
            wheelchair: false,
            inaccessible_street_reluctance: OrderedFloat(25.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn speed_follows_mode() {
        let mut req = TransferRequest::default();
        assert_eq!(req.speed(), 1.33);
        req.mode = TransferMode::Bike;
        assert_eq!(req.speed(), 5.0);
        req.mode = TransferMode::Car;
        assert_eq!(req.speed(), 11.2);
    }

    #[test]
    fn usable_as_hash_key() {
        let a = TransferRequest::default();
        let b = TransferRequest {
            walk_speed: OrderedFloat(1.0),
            ..TransferRequest::default()
        };
        let set: HashSet<_> = [a.clone(), a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn deserialize_with_defaults() {
        let req: TransferRequest =
            serde_json::from_str(r#"{"mode": "bike", "reluctance": 1.5}"#).unwrap();
        assert_eq!(req.mode, TransferMode::Bike);
        assert_eq!(req.reluctance, OrderedFloat(1.5));
        assert_eq!(req.walk_speed, OrderedFloat(1.33));
    }
}
