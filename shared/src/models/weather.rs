//! Weather data models

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw forecast sample as reported by the weather provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSample {
    /// Sample time in the provider's reporting timezone
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub precipitation_mm: Decimal,
    pub wind_speed: Decimal,
    pub condition: String,
}

/// Per-day fold of all samples sharing a calendar date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max_temperature_celsius: Decimal,
    pub min_temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub precipitation_mm: Decimal,
    pub condition: String,
    pub wind_speed: Decimal,
}

impl DailyForecast {
    /// Midpoint of the day's temperature range
    pub fn mean_temperature(&self) -> Decimal {
        self.max_temperature_celsius
            .saturating_add(self.min_temperature_celsius)
            / Decimal::TWO
    }
}

/// Conditions at the current time slice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentObservation {
    pub temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub wind_speed: Decimal,
    pub precipitation_mm: Decimal,
    pub condition: String,
}

/// Statistical digest of a multi-day forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    pub location: String,
    pub current_conditions: String,
    pub current: Option<CurrentObservation>,
    pub total_rainfall_mm: Decimal,
    pub average_rainfall_mm: Decimal,
    pub average_temperature_celsius: Decimal,
    pub average_humidity_percent: Decimal,
    pub rainy_days: u32,
    pub dry_days: u32,
    /// Up to three "{start}–{end}" labels in chronological order
    pub best_planting_periods: Vec<String>,
    pub daily: Vec<DailyForecast>,
}

impl WeatherSummary {
    /// Whether the summary carries any observation the models can use
    pub fn has_observation(&self) -> bool {
        self.current.is_some()
    }

    /// Precipitation summed over the first `days` forecast days
    pub fn upcoming_precipitation(&self, days: usize) -> Decimal {
        self.daily
            .iter()
            .take(days)
            .map(|d| d.precipitation_mm)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
