//! Alert engine tests
//!
//! Tests for alert derivation including:
//! - Property: ranking is ordered by severity
//! - Property: top alerts surface every actionable alert first

use chrono::{FixedOffset, TimeZone};
use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::models::{AlertSeverity, ForecastSample, WeatherSummary};
use shared::pipeline::{top_alerts, AlertEngine, SuggestionParser, WeatherAggregator};

fn summary_from(temp: Decimal, humidity: Decimal, wind: Decimal, rain: &[Decimal]) -> WeatherSummary {
    let tz = FixedOffset::east_opt(19800).unwrap();
    let samples: Vec<ForecastSample> = rain
        .iter()
        .enumerate()
        .map(|(i, r)| ForecastSample {
            timestamp: tz.with_ymd_and_hms(2026, 10, 20 + i as u32, 9, 0, 0).unwrap(),
            temperature_celsius: temp,
            humidity_percent: humidity,
            precipitation_mm: *r,
            wind_speed: wind,
            condition: "haze".to_string(),
        })
        .collect();
    WeatherAggregator::default().aggregate("Bhopal", &samples)
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_no_inputs_gives_fallback_pair() {
        let alerts = AlertEngine::default().derive_alerts(None, None);

        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.severity == AlertSeverity::Normal));
    }

    #[test]
    fn test_end_to_end_hot_dry_forecast() {
        let weather = summary_from(
            Decimal::from(39),
            Decimal::from(20),
            Decimal::from(4),
            &[Decimal::ZERO; 5],
        );
        let suggestions = SuggestionParser::default().parse("", &weather);
        let alerts = AlertEngine::default().derive_alerts(Some(&weather), Some(&suggestions));

        let titles: Vec<&str> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles[0], "High Temperature");
        assert!(titles.contains(&"Dry Period"));
        assert!(alerts.iter().any(|a| a.description.contains("heat stress")));

        let top = top_alerts(&alerts, 2);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|a| a.severity.is_actionable()));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating temperatures
    fn temperature_strategy() -> impl Strategy<Value = Decimal> {
        (-100i64..=450i64).prop_map(|n| Decimal::new(n, 1)) // -10.0 to 45.0°C
    }

    /// Strategy for generating humidity percentages
    fn humidity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100i64).prop_map(Decimal::from)
    }

    /// Strategy for generating wind speeds
    fn wind_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=300i64).prop_map(|n| Decimal::new(n, 1)) // 0.0 to 30.0
    }

    /// Strategy for generating daily rainfall
    fn rain_strategy() -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec((0i64..=400i64).prop_map(|n| Decimal::new(n, 1)), 0..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(150))]

        /// Property: alerts come out sorted by severity rank and never empty
        #[test]
        fn prop_alerts_ranked(
            temp in temperature_strategy(),
            humidity in humidity_strategy(),
            wind in wind_strategy(),
            rain in rain_strategy(),
        ) {
            let weather = summary_from(temp, humidity, wind, &rain);
            let alerts = AlertEngine::default().derive_alerts(Some(&weather), None);

            prop_assert!(!alerts.is_empty());
            for pair in alerts.windows(2) {
                prop_assert!(pair[0].severity.rank() <= pair[1].severity.rank());
            }
        }

        /// Property: top alerts never hide an actionable alert behind a normal one
        #[test]
        fn prop_top_alerts_actionable(
            temp in temperature_strategy(),
            humidity in humidity_strategy(),
            wind in wind_strategy(),
            rain in rain_strategy(),
            n in 1usize..5,
        ) {
            let weather = summary_from(temp, humidity, wind, &rain);
            let alerts = AlertEngine::default().derive_alerts(Some(&weather), None);
            let top = top_alerts(&alerts, n);

            let actionable = alerts.iter().filter(|a| a.severity.is_actionable()).count();
            prop_assert_eq!(top.len(), actionable.min(n));
            prop_assert!(top.iter().all(|a| a.severity.is_actionable()));
        }
    }
}
