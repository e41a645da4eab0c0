//! Weather API client for fetching forecast data
//!
//! Integrates with the OpenWeatherMap 5-day / 3-hour forecast API

use chrono::{DateTime, FixedOffset};
use reqwest::{Client, StatusCode};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::models::ForecastSample;
use shared::types::GpsCoordinates;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
}

/// How to identify the forecast location
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates(GpsCoordinates),
}

/// Forecast samples for one resolved location
#[derive(Debug, Clone)]
pub struct ProviderForecast {
    pub location_name: String,
    pub samples: Vec<ForecastSample>,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    city: OWMCity,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    name: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    weather: Vec<OWMWeather>,
    wind: OWMWind,
    rain: Option<OWMForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    /// Build from configuration; `None` when no API key is set
    pub fn from_config(config: &WeatherConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }

        Some(Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            units: config.units.clone(),
        })
    }

    /// Fetch the 3-hourly forecast for a location
    pub async fn get_forecast(&self, location: &LocationQuery) -> AppResult<ProviderForecast> {
        let url = format!("{}/forecast", self.base_url);

        let mut params = vec![
            ("appid", self.api_key.clone()),
            ("units", self.units.clone()),
        ];
        match location {
            LocationQuery::Name(name) => params.push(("q", name.clone())),
            LocationQuery::Coordinates(coords) => {
                params.push(("lat", coords.latitude.to_string()));
                params.push(("lon", coords.longitude.to_string()));
            }
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AppError::NotFound("Location".to_string())),
            StatusCode::UNAUTHORIZED => {
                return Err(AppError::Unauthorized {
                    message: "Weather API rejected the configured key".to_string(),
                })
            }
            status if status.is_server_error() => return Err(AppError::WeatherServiceUnavailable),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::ExternalService(format!(
                    "Weather API error: {} - {}",
                    status, body
                )));
            }
            _ => {}
        }

        let data: OWMForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse forecast response: {}", e))
        })?;

        Ok(convert_forecast_response(data))
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .unwrap_or_default()
}

/// Convert OpenWeatherMap forecast response to samples in the city's timezone
fn convert_forecast_response(data: OWMForecastResponse) -> ProviderForecast {
    let offset = FixedOffset::east_opt(data.city.timezone)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));

    let samples = data
        .list
        .into_iter()
        .filter_map(|item| {
            let timestamp = DateTime::from_timestamp(item.dt, 0)?.with_timezone(&offset);
            Some(ForecastSample {
                timestamp,
                temperature_celsius: to_decimal(item.main.temp),
                humidity_percent: to_decimal(item.main.humidity),
                precipitation_mm: item
                    .rain
                    .and_then(|r| r.three_hour)
                    .map(to_decimal)
                    .unwrap_or(Decimal::ZERO),
                wind_speed: to_decimal(item.wind.speed),
                condition: item
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_default(),
            })
        })
        .collect();

    ProviderForecast {
        location_name: data.city.name,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "cod": "200",
        "list": [
            {"dt": 1792800000, "main": {"temp": 27.34, "humidity": 71},
             "weather": [{"main": "Rain", "description": "light rain"}],
             "wind": {"speed": 3.6}, "rain": {"3h": 0.42}},
            {"dt": 1792810800, "main": {"temp": 25.1, "humidity": 80},
             "weather": [], "wind": {"speed": 2.0}}
        ],
        "city": {"name": "Pune", "coord": {"lat": 18.52, "lon": 73.86}, "timezone": 19800}
    }"#;

    #[test]
    fn test_convert_forecast_response() {
        let data: OWMForecastResponse = serde_json::from_str(FIXTURE).unwrap();
        let forecast = convert_forecast_response(data);

        assert_eq!(forecast.location_name, "Pune");
        assert_eq!(forecast.samples.len(), 2);

        let first = &forecast.samples[0];
        assert_eq!(first.timestamp.offset().local_minus_utc(), 19800);
        assert_eq!(first.temperature_celsius, Decimal::new(2734, 2));
        assert_eq!(first.precipitation_mm, Decimal::new(42, 2));
        assert_eq!(first.condition, "light rain");

        let second = &forecast.samples[1];
        assert_eq!(second.precipitation_mm, Decimal::ZERO);
        assert_eq!(second.condition, "");
    }

    #[test]
    fn test_from_config_requires_key() {
        let mut config = WeatherConfig {
            api_endpoint: "https://example.test/data/2.5/".to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
        };
        assert!(WeatherClient::from_config(&config).is_none());

        config.api_key = "k".to_string();
        let client = WeatherClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test/data/2.5");
    }
}
