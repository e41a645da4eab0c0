//! Weather service resolving locations to forecast summaries

use shared::models::{ForecastSample, WeatherSummary};
use shared::pipeline::{AggregatorConfig, WeatherAggregator};

use crate::external::weather::{LocationQuery, WeatherClient};

/// Weather service; any provider failure degrades to "no data"
#[derive(Clone)]
pub struct WeatherService {
    weather_client: Option<WeatherClient>,
    aggregator: WeatherAggregator,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(weather_client: Option<WeatherClient>, config: AggregatorConfig) -> Self {
        Self {
            weather_client,
            aggregator: WeatherAggregator::new(config),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.weather_client.is_some()
    }

    /// Fetch and summarize the forecast, `None` when no usable data exists
    pub async fn summarize(&self, location: &LocationQuery) -> Option<WeatherSummary> {
        let Some(client) = self.weather_client.as_ref() else {
            tracing::debug!("Weather client not configured, skipping forecast lookup");
            return None;
        };

        match client.get_forecast(location).await {
            Ok(forecast) => {
                let label = if forecast.location_name.is_empty() {
                    describe(location)
                } else {
                    forecast.location_name
                };
                self.summarize_samples(&label, &forecast.samples)
            }
            Err(e) => {
                tracing::warn!(location = %describe(location), error = %e, "Weather lookup failed");
                None
            }
        }
    }

    /// Summarize already-fetched samples; empty input means no data
    pub fn summarize_samples(
        &self,
        label: &str,
        samples: &[ForecastSample],
    ) -> Option<WeatherSummary> {
        if samples.is_empty() {
            return None;
        }
        Some(self.aggregator.aggregate(label, samples))
    }
}

fn describe(location: &LocationQuery) -> String {
    match location {
        LocationQuery::Name(name) => name.clone(),
        LocationQuery::Coordinates(c) => format!("{}, {}", c.latitude, c.longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rust_decimal::Decimal;
    use shared::types::GpsCoordinates;

    #[tokio::test]
    async fn test_unconfigured_service_has_no_data() {
        let service = WeatherService::new(None, AggregatorConfig::default());
        assert!(!service.is_configured());
        assert!(service
            .summarize(&LocationQuery::Name("Pune".to_string()))
            .await
            .is_none());
    }

    #[test]
    fn test_summarize_samples() {
        let service = WeatherService::new(None, AggregatorConfig::default());
        assert!(service.summarize_samples("Pune", &[]).is_none());

        let tz = FixedOffset::east_opt(19800).unwrap();
        let sample = ForecastSample {
            timestamp: tz.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap(),
            temperature_celsius: Decimal::from(24),
            humidity_percent: Decimal::from(70),
            precipitation_mm: Decimal::ONE,
            wind_speed: Decimal::from(2),
            condition: "light rain".to_string(),
        };
        let summary = service.summarize_samples("Pune", &[sample]).unwrap();
        assert_eq!(summary.location, "Pune");
        assert_eq!(summary.rainy_days, 1);
    }

    #[test]
    fn test_describe_coordinates() {
        let query = LocationQuery::Coordinates(GpsCoordinates::new(Decimal::new(185, 1), Decimal::new(739, 1)));
        assert_eq!(describe(&query), "18.5, 73.9");
    }
}
