//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check whether the point lies inside a bounding box (edges inclusive)
    pub fn is_within(&self, bounds: &BoundingRegion) -> bool {
        self.latitude >= bounds.min_latitude
            && self.latitude <= bounds.max_latitude
            && self.longitude >= bounds.min_longitude
            && self.longitude <= bounds.max_longitude
    }
}

/// Latitude/longitude rectangle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingRegion {
    pub min_latitude: Decimal,
    pub max_latitude: Decimal,
    pub min_longitude: Decimal,
    pub max_longitude: Decimal,
}

/// Named farm location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub name: String,
    pub coordinates: Option<GpsCoordinates>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
        }
    }
}

/// Round half away from zero, the way figures are shown to farmers
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_within_inclusive_edges() {
        let bounds = BoundingRegion {
            min_latitude: Decimal::from(10),
            max_latitude: Decimal::from(20),
            min_longitude: Decimal::from(70),
            max_longitude: Decimal::from(80),
        };

        assert!(GpsCoordinates::new(Decimal::from(10), Decimal::from(80)).is_within(&bounds));
        assert!(GpsCoordinates::new(Decimal::new(155, 1), Decimal::from(75)).is_within(&bounds));
        assert!(!GpsCoordinates::new(Decimal::new(201, 1), Decimal::from(75)).is_within(&bounds));
        assert!(!GpsCoordinates::new(Decimal::from(15), Decimal::from(69)).is_within(&bounds));
    }

    #[test]
    fn test_round_dp_half_away_from_zero() {
        assert_eq!(round_dp(Decimal::new(25, 2), 1), Decimal::new(3, 1));
        assert_eq!(round_dp(Decimal::new(35, 2), 1), Decimal::new(4, 1));
        assert_eq!(round_dp(Decimal::new(5, 1), 0), Decimal::ONE);
    }
}
