//! Rule-based alert derivation and ranking

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertCategory, AlertSeverity, CropSuggestionsResponse, WeatherSummary};

/// Timeframe fragments that mark a suggestion as plantable right away
const IMMEDIATE_MARKERS: &[&str] = &["immediate", "now", "1-2 week"];

/// Weather thresholds; comparisons are strict
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertThresholds {
    pub high_temperature_celsius: Decimal,
    pub frost_temperature_celsius: Decimal,
    pub high_humidity_percent: Decimal,
    /// In whatever unit the provider reports
    pub strong_wind_speed: Decimal,
    pub heavy_rain_mm: Decimal,
    pub dry_period_mm: Decimal,
    /// Forecast days summed for the rain rules
    pub precipitation_window_days: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_temperature_celsius: Decimal::from(35),
            frost_temperature_celsius: Decimal::from(5),
            high_humidity_percent: Decimal::from(90),
            strong_wind_speed: Decimal::from(15),
            heavy_rain_mm: Decimal::from(50),
            dry_period_mm: Decimal::TWO,
            precipitation_window_days: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

/// Alerts of one derivation cycle share an instant
struct Cycle {
    at: DateTime<Utc>,
    alerts: Vec<Alert>,
}

impl Cycle {
    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind: &str,
        severity: AlertSeverity,
        category: AlertCategory,
        icon: &str,
        time_label: &str,
        title: &str,
        subtitle: String,
        description: String,
    ) {
        self.alerts.push(Alert {
            id: format!("{}-{}", kind, self.at.timestamp_millis()),
            title: title.to_string(),
            subtitle,
            description,
            severity,
            icon: icon.to_string(),
            time_label: time_label.to_string(),
            category,
            generated_at: self.at,
        });
    }
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Derive and rank alerts for the current moment
    pub fn derive_alerts(
        &self,
        weather: Option<&WeatherSummary>,
        suggestions: Option<&CropSuggestionsResponse>,
    ) -> Vec<Alert> {
        self.derive_alerts_at(weather, suggestions, Utc::now())
    }

    pub fn derive_alerts_at(
        &self,
        weather: Option<&WeatherSummary>,
        suggestions: Option<&CropSuggestionsResponse>,
        generated_at: DateTime<Utc>,
    ) -> Vec<Alert> {
        let mut cycle = Cycle {
            at: generated_at,
            alerts: Vec::new(),
        };

        if weather.is_none() && suggestions.is_none() {
            fallback_alerts(&mut cycle);
            return cycle.alerts;
        }

        if let Some(summary) = weather {
            self.weather_alerts(summary, &mut cycle);
        }
        if let Some(response) = suggestions {
            suggestion_alerts(response, &mut cycle);
        }

        if cycle.alerts.is_empty() {
            cycle.push(
                "stable",
                AlertSeverity::Normal,
                AlertCategory::Weather,
                "check-circle",
                "Today",
                "Conditions Stable",
                "No action needed".to_string(),
                "No weather or crop risks were detected for the coming days.".to_string(),
            );
        }

        rank_alerts(&mut cycle.alerts);
        cycle.alerts
    }

    fn weather_alerts(&self, summary: &WeatherSummary, cycle: &mut Cycle) {
        let t = &self.thresholds;

        if let Some(current) = summary.current.as_ref() {
            if current.temperature_celsius > t.high_temperature_celsius {
                cycle.push(
                    "heat",
                    AlertSeverity::Warning,
                    AlertCategory::Weather,
                    "thermometer",
                    "Now",
                    "High Temperature",
                    format!("{}°C in {}", current.temperature_celsius, summary.location),
                    "Irrigate early or late in the day and provide shade for seedlings."
                        .to_string(),
                );
            }
            if current.temperature_celsius < t.frost_temperature_celsius {
                cycle.push(
                    "frost",
                    AlertSeverity::Urgent,
                    AlertCategory::Weather,
                    "snowflake",
                    "Now",
                    "Frost Warning",
                    format!("{}°C in {}", current.temperature_celsius, summary.location),
                    "Cover sensitive crops tonight and avoid irrigating late in the evening."
                        .to_string(),
                );
            }
            if current.humidity_percent > t.high_humidity_percent {
                cycle.push(
                    "humidity",
                    AlertSeverity::Warning,
                    AlertCategory::Weather,
                    "droplets",
                    "Now",
                    "High Humidity",
                    format!("{}% relative humidity", current.humidity_percent),
                    "Humid air favours fungal disease; inspect leaves and improve airflow."
                        .to_string(),
                );
            }
            if current.wind_speed > t.strong_wind_speed {
                cycle.push(
                    "wind",
                    AlertSeverity::Warning,
                    AlertCategory::Weather,
                    "wind",
                    "Now",
                    "Strong Wind",
                    format!("Wind speed {}", current.wind_speed),
                    "Stake tall plants and postpone spraying.".to_string(),
                );
            }
        }

        if summary.daily.is_empty() {
            return;
        }

        let window = t.precipitation_window_days;
        let upcoming = summary.upcoming_precipitation(window);
        let time_label = format!("Next {} days", window);

        if upcoming > t.heavy_rain_mm {
            cycle.push(
                "heavy-rain",
                AlertSeverity::Warning,
                AlertCategory::Weather,
                "cloud-rain",
                &time_label,
                "Heavy Rainfall",
                format!("{} mm expected", upcoming),
                "Clear drainage channels and delay fertilizer application.".to_string(),
            );
        } else if upcoming < t.dry_period_mm {
            cycle.push(
                "dry",
                AlertSeverity::Normal,
                AlertCategory::Weather,
                "sun",
                &time_label,
                "Dry Period",
                format!("Only {} mm expected", upcoming),
                "Plan irrigation; little rain is forecast.".to_string(),
            );
        }
    }
}

fn suggestion_alerts(response: &CropSuggestionsResponse, cycle: &mut Cycle) {
    for (index, risk) in response.risk_factors.iter().enumerate() {
        cycle.push(
            &format!("risk-{}", index),
            AlertSeverity::Warning,
            AlertCategory::Crop,
            "alert-triangle",
            "This season",
            "Crop Risk",
            response.location.clone(),
            risk.clone(),
        );
    }

    let ready: Vec<&str> = response
        .suggestions
        .iter()
        .filter(|s| {
            let timeframe = s.planting_timeframe.to_lowercase();
            IMMEDIATE_MARKERS.iter().any(|m| timeframe.contains(m))
        })
        .map(|s| s.crop_name.as_str())
        .collect();

    if !ready.is_empty() {
        cycle.push(
            "planting",
            AlertSeverity::Normal,
            AlertCategory::Crop,
            "sprout",
            "Next 2 weeks",
            "Optimal Planting Window",
            ready.join(", "),
            format!("Conditions suit planting {} soon.", ready.join(", ")),
        );
    }

    if !response.general_advice.trim().is_empty() {
        cycle.push(
            "advice",
            AlertSeverity::Normal,
            AlertCategory::General,
            "lightbulb",
            "Today",
            "Farming Advice",
            response.location.clone(),
            response.general_advice.clone(),
        );
    }
}

fn fallback_alerts(cycle: &mut Cycle) {
    cycle.push(
        "data-unavailable",
        AlertSeverity::Normal,
        AlertCategory::Weather,
        "cloud-off",
        "Now",
        "Weather Data Unavailable",
        "Forecast could not be loaded".to_string(),
        "Alerts will appear once weather data is available for your location.".to_string(),
    );
    cycle.push(
        "monitor",
        AlertSeverity::Normal,
        AlertCategory::General,
        "eye",
        "Today",
        "Monitor Conditions",
        "Keep an eye on your fields".to_string(),
        "Check crops for stress, pests and standing water while data is unavailable.".to_string(),
    );
}

/// Stable sort: severity rank first, then most recently generated
pub fn rank_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| b.generated_at.cmp(&a.generated_at))
    });
}

/// Urgent and warning alerts only, in their existing order, at most `n`
pub fn top_alerts(alerts: &[Alert], n: usize) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|a| a.severity.is_actionable())
        .take(n)
        .cloned()
        .collect()
}
