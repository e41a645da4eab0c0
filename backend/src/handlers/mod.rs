//! HTTP request handlers

pub mod alerts;
pub mod area;
pub mod health;
pub mod suggestions;
pub mod weather;
pub mod yield_prediction;

pub use alerts::*;
pub use area::*;
pub use health::*;
pub use suggestions::*;
pub use weather::*;
pub use yield_prediction::*;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::types::GpsCoordinates;
use shared::validation::{validate_coordinates, validate_location_name};

use crate::error::{AppError, AppResult};
use crate::external::LocationQuery;

/// Place a request refers to, by name or by coordinates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub location: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl LocationInput {
    /// Resolve to a provider query; coordinates win over the name
    pub fn to_query(&self) -> AppResult<Option<LocationQuery>> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                let coords = GpsCoordinates::new(latitude, longitude);
                validate_coordinates(&coords).map_err(|e| AppError::validation("coordinates", e))?;
                return Ok(Some(LocationQuery::Coordinates(coords)));
            }
            (Some(_), None) => {
                return Err(AppError::validation(
                    "longitude",
                    "Longitude is required with latitude",
                ));
            }
            (None, Some(_)) => {
                return Err(AppError::validation("latitude", "Latitude is required with longitude"));
            }
            (None, None) => {}
        }

        match self.location.as_deref() {
            Some(name) => {
                validate_location_name(name).map_err(|e| AppError::validation("location", e))?;
                Ok(Some(LocationQuery::Name(name.trim().to_string())))
            }
            None => Ok(None),
        }
    }

    /// Like [`to_query`](Self::to_query) but a place is mandatory
    pub fn require_query(&self) -> AppResult<LocationQuery> {
        self.to_query()?
            .ok_or_else(|| {
                AppError::validation("location", "A location name or coordinates are required")
            })
    }

    /// Display label used when the provider returns no data
    pub fn label(&self) -> String {
        match (self.location.as_deref(), self.latitude, self.longitude) {
            (Some(name), _, _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
            _ => "Unknown location".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(location: Option<&str>, latitude: Option<Decimal>, longitude: Option<Decimal>) -> LocationInput {
        LocationInput {
            location: location.map(str::to_string),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_coordinates_take_precedence() {
        let query = input(Some("Nashik"), Some(Decimal::new(200, 1)), Some(Decimal::new(738, 1)))
            .to_query()
            .unwrap();
        assert!(matches!(query, Some(LocationQuery::Coordinates(_))));
    }

    #[test]
    fn test_name_is_trimmed() {
        let query = input(Some("  Nashik "), None, None).to_query().unwrap();
        assert!(matches!(query, Some(LocationQuery::Name(ref n)) if n == "Nashik"));
    }

    #[test]
    fn test_half_coordinates_rejected() {
        let result = input(None, Some(Decimal::from(20)), None).to_query();
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "longitude"));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let result = input(None, Some(Decimal::from(91)), Some(Decimal::ZERO)).to_query();
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(input(Some("   "), None, None).to_query().is_err());
    }

    #[test]
    fn test_missing_place() {
        assert!(input(None, None, None).to_query().unwrap().is_none());
        assert!(input(None, None, None).require_query().is_err());
        assert_eq!(input(None, None, None).label(), "Unknown location");
    }
}
