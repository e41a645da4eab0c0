//! Forecast aggregation
//!
//! Folds raw forecast samples into one record per calendar day and derives
//! the multi-day digest used by the suggestion, yield and alert stages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CurrentObservation, DailyForecast, ForecastSample, WeatherSummary};
use crate::types::round_dp;

/// Criteria for a "best planting period"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantingWindowCriteria {
    pub window_days: usize,
    pub min_average_temperature: Decimal,
    pub max_average_temperature: Decimal,
    /// Window rainfall must be strictly above this
    pub min_total_rainfall_exclusive: Decimal,
    pub max_total_rainfall: Decimal,
    pub max_windows: usize,
}

impl Default for PlantingWindowCriteria {
    fn default() -> Self {
        Self {
            window_days: 3,
            min_average_temperature: Decimal::from(15),
            max_average_temperature: Decimal::from(35),
            min_total_rainfall_exclusive: Decimal::ONE,
            max_total_rainfall: Decimal::from(10),
            max_windows: 3,
        }
    }
}

/// Aggregator tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatorConfig {
    /// A day with more precipitation than this counts as rainy
    pub rainy_day_threshold_mm: Decimal,
    pub planting: PlantingWindowCriteria,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            rainy_day_threshold_mm: Decimal::new(5, 1),
            planting: PlantingWindowCriteria::default(),
        }
    }
}

/// Builds daily forecasts and weather summaries from raw samples
#[derive(Debug, Clone, Default)]
pub struct WeatherAggregator {
    config: AggregatorConfig,
}

/// Running fold of one calendar day
struct DayAccumulator {
    max_temperature: Decimal,
    min_temperature: Decimal,
    humidity_sum: Decimal,
    precipitation_sum: Decimal,
    wind_sum: Decimal,
    count: usize,
    /// Condition texts with their counts, in first-seen order
    conditions: Vec<(String, usize)>,
}

impl DayAccumulator {
    fn start(sample: &ForecastSample) -> Self {
        Self {
            max_temperature: sample.temperature_celsius,
            min_temperature: sample.temperature_celsius,
            humidity_sum: Decimal::ZERO,
            precipitation_sum: Decimal::ZERO,
            wind_sum: Decimal::ZERO,
            count: 0,
            conditions: Vec::new(),
        }
    }

    fn fold(&mut self, sample: &ForecastSample) {
        self.max_temperature = self.max_temperature.max(sample.temperature_celsius);
        self.min_temperature = self.min_temperature.min(sample.temperature_celsius);
        self.humidity_sum = self.humidity_sum.saturating_add(sample.humidity_percent);
        self.precipitation_sum = self
            .precipitation_sum
            .saturating_add(sample.precipitation_mm.max(Decimal::ZERO));
        self.wind_sum = self.wind_sum.saturating_add(sample.wind_speed);
        self.count += 1;

        match self
            .conditions
            .iter_mut()
            .find(|(text, _)| *text == sample.condition)
        {
            Some((_, seen)) => *seen += 1,
            None => self.conditions.push((sample.condition.clone(), 1)),
        }
    }

    fn finish(self, date: NaiveDate) -> DailyForecast {
        let count = Decimal::from(self.count.max(1));

        // Strictly greater keeps the earliest condition on ties
        let mut dominant: Option<&(String, usize)> = None;
        for entry in &self.conditions {
            if dominant.map_or(true, |best| entry.1 > best.1) {
                dominant = Some(entry);
            }
        }

        DailyForecast {
            date,
            max_temperature_celsius: self.max_temperature,
            min_temperature_celsius: self.min_temperature,
            humidity_percent: round_dp(self.humidity_sum / count, 1),
            precipitation_mm: round_dp(self.precipitation_sum, 1),
            condition: dominant.map(|(text, _)| text.clone()).unwrap_or_default(),
            wind_speed: round_dp(self.wind_sum / count, 1),
        }
    }
}

impl WeatherAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// One record per distinct calendar date, ascending.
    ///
    /// The date is taken in each sample's own reporting timezone.
    pub fn daily_forecasts(&self, samples: &[ForecastSample]) -> Vec<DailyForecast> {
        let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

        for sample in samples {
            days.entry(sample.timestamp.date_naive())
                .or_insert_with(|| DayAccumulator::start(sample))
                .fold(sample);
        }

        days.into_iter()
            .map(|(date, acc)| acc.finish(date))
            .collect()
    }

    /// Aggregate a forecast into a summary; an empty forecast yields zeroed statistics
    pub fn aggregate(&self, location: &str, samples: &[ForecastSample]) -> WeatherSummary {
        let daily = self.daily_forecasts(samples);
        let current = samples
            .iter()
            .min_by_key(|s| s.timestamp)
            .map(|s| CurrentObservation {
                temperature_celsius: s.temperature_celsius,
                humidity_percent: s.humidity_percent,
                wind_speed: s.wind_speed,
                precipitation_mm: s.precipitation_mm,
                condition: s.condition.clone(),
            });

        let day_count = daily.len();
        let divisor = Decimal::from(day_count.max(1));

        let total_rainfall = saturating_sum(daily.iter().map(|d| d.precipitation_mm));
        let temperature_sum = saturating_sum(daily.iter().map(|d| d.mean_temperature()));
        let humidity_sum = saturating_sum(daily.iter().map(|d| d.humidity_percent));

        let rainy_days = daily
            .iter()
            .filter(|d| d.precipitation_mm > self.config.rainy_day_threshold_mm)
            .count() as u32;

        tracing::debug!(
            location,
            samples = samples.len(),
            days = day_count,
            "aggregated forecast"
        );

        WeatherSummary {
            location: location.to_string(),
            current_conditions: describe_current(current.as_ref()),
            current,
            total_rainfall_mm: round_dp(total_rainfall, 1),
            average_rainfall_mm: round_dp(total_rainfall / divisor, 1),
            average_temperature_celsius: round_dp(temperature_sum / divisor, 1),
            average_humidity_percent: round_dp(humidity_sum / divisor, 1),
            rainy_days,
            dry_days: day_count as u32 - rainy_days,
            best_planting_periods: self.best_planting_periods(&daily),
            daily,
        }
    }

    /// Labels of qualifying contiguous windows, first ones found in date order
    pub fn best_planting_periods(&self, daily: &[DailyForecast]) -> Vec<String> {
        let criteria = &self.config.planting;
        if criteria.window_days == 0 || daily.len() < criteria.window_days {
            return Vec::new();
        }

        let window_len = Decimal::from(criteria.window_days);

        daily
            .windows(criteria.window_days)
            .filter(|window| {
                let average_temperature =
                    saturating_sum(window.iter().map(|d| d.mean_temperature())) / window_len;
                let total_rainfall = saturating_sum(window.iter().map(|d| d.precipitation_mm));

                average_temperature >= criteria.min_average_temperature
                    && average_temperature <= criteria.max_average_temperature
                    && total_rainfall > criteria.min_total_rainfall_exclusive
                    && total_rainfall <= criteria.max_total_rainfall
            })
            .take(criteria.max_windows)
            .map(|window| format!("{}–{}", window[0].date, window[window.len() - 1].date))
            .collect()
    }
}

/// Sum that pins at the decimal range instead of overflowing
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn describe_current(current: Option<&CurrentObservation>) -> String {
    match current {
        Some(obs) => format!(
            "{}, {}°C, {}% humidity, wind {}",
            obs.condition,
            round_dp(obs.temperature_celsius, 1),
            round_dp(obs.humidity_percent, 1),
            round_dp(obs.wind_speed, 1),
        ),
        None => "No current observation available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    fn sample(day: u32, hour: u32, temp: i64, rain_tenths: i64, condition: &str) -> ForecastSample {
        let timestamp: DateTime<FixedOffset> =
            ist().with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap();
        ForecastSample {
            timestamp,
            temperature_celsius: Decimal::from(temp),
            humidity_percent: Decimal::from(60),
            precipitation_mm: Decimal::new(rain_tenths, 1),
            wind_speed: Decimal::new(35, 1),
            condition: condition.to_string(),
        }
    }

    #[test]
    fn test_groups_samples_by_calendar_day() {
        let samples = vec![
            sample(1, 6, 20, 0, "clear sky"),
            sample(1, 12, 30, 5, "light rain"),
            sample(1, 18, 25, 10, "light rain"),
            sample(2, 9, 22, 0, "clouds"),
        ];

        let daily = WeatherAggregator::default().daily_forecasts(&samples);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].max_temperature_celsius, Decimal::from(30));
        assert_eq!(daily[0].min_temperature_celsius, Decimal::from(20));
        assert_eq!(daily[0].precipitation_mm, Decimal::new(15, 1));
        assert_eq!(daily[0].condition, "light rain");
        assert_eq!(daily[0].wind_speed, Decimal::new(35, 1));
        assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2026, 6, 2).unwrap());
    }

    #[test]
    fn test_date_uses_reporting_timezone() {
        // 23:30 IST on June 1 is 18:00 UTC; 00:30 IST on June 2 is still June 1 in UTC
        let late = ist().with_ymd_and_hms(2026, 6, 1, 23, 30, 0).unwrap();
        let early = ist().with_ymd_and_hms(2026, 6, 2, 0, 30, 0).unwrap();
        let mut a = sample(1, 0, 20, 0, "clear");
        a.timestamp = late;
        let mut b = sample(1, 0, 20, 0, "clear");
        b.timestamp = early;

        let daily = WeatherAggregator::default().daily_forecasts(&[b, a]);
        assert_eq!(daily.len(), 2);
        assert!(daily[0].date < daily[1].date);
    }

    #[test]
    fn test_dominant_condition_tie_keeps_first_seen() {
        let samples = vec![
            sample(3, 6, 20, 0, "haze"),
            sample(3, 9, 20, 0, "clear sky"),
        ];
        let daily = WeatherAggregator::default().daily_forecasts(&samples);
        assert_eq!(daily[0].condition, "haze");
    }

    #[test]
    fn test_summary_statistics() {
        let samples = vec![
            sample(1, 6, 20, 0, "clear"),
            sample(1, 15, 30, 0, "clear"),
            sample(2, 6, 18, 20, "rain"),
            sample(2, 15, 22, 0, "rain"),
        ];

        let summary = WeatherAggregator::default().aggregate("Pune", &samples);

        assert_eq!(summary.location, "Pune");
        assert_eq!(summary.daily.len(), 2);
        assert_eq!(summary.total_rainfall_mm, Decimal::from(2));
        assert_eq!(summary.average_rainfall_mm, Decimal::ONE);
        // day midpoints 25 and 20
        assert_eq!(summary.average_temperature_celsius, Decimal::new(225, 1));
        assert_eq!(summary.average_humidity_percent, Decimal::from(60));
        assert_eq!(summary.rainy_days, 1);
        assert_eq!(summary.dry_days, 1);
        assert!(summary.best_planting_periods.is_empty());
        assert_eq!(
            summary.current.as_ref().map(|c| c.temperature_celsius),
            Some(Decimal::from(20))
        );
        assert!(summary.current_conditions.starts_with("clear, 20°C"));
    }

    #[test]
    fn test_empty_forecast_gives_zeroed_summary() {
        let summary = WeatherAggregator::default().aggregate("Nowhere", &[]);

        assert!(summary.daily.is_empty());
        assert!(summary.current.is_none());
        assert_eq!(summary.average_temperature_celsius, Decimal::ZERO);
        assert_eq!(summary.average_rainfall_mm, Decimal::ZERO);
        assert_eq!(summary.rainy_days, 0);
        assert_eq!(summary.dry_days, 0);
        assert!(summary.best_planting_periods.is_empty());
        assert_eq!(summary.current_conditions, "No current observation available");
    }

    #[test]
    fn test_planting_windows_capped_at_three_in_order() {
        // Seven mild days with 1mm each: every 3-day window totals 3mm
        let samples: Vec<_> = (1..=7).map(|d| sample(d, 12, 24, 10, "clouds")).collect();
        let summary = WeatherAggregator::default().aggregate("Nashik", &samples);

        assert_eq!(
            summary.best_planting_periods,
            vec![
                "2026-06-01–2026-06-03".to_string(),
                "2026-06-02–2026-06-04".to_string(),
                "2026-06-03–2026-06-05".to_string(),
            ]
        );
    }

    #[test]
    fn test_window_rainfall_lower_bound_is_exclusive() {
        // Three days totalling exactly 1mm
        let samples = vec![
            sample(1, 12, 24, 5, "clouds"),
            sample(2, 12, 24, 5, "clouds"),
            sample(3, 12, 24, 0, "clouds"),
        ];
        let summary = WeatherAggregator::default().aggregate("Nashik", &samples);
        assert!(summary.best_planting_periods.is_empty());
    }

    #[test]
    fn test_extreme_precipitation_saturates() {
        let mut flood = vec![
            sample(1, 9, 24, 0, "rain"),
            sample(1, 15, 24, 0, "rain"),
            sample(2, 12, 24, 0, "rain"),
        ];
        for s in &mut flood {
            s.precipitation_mm = Decimal::MAX;
        }
        let summary = WeatherAggregator::default().aggregate("Cherrapunji", &flood);

        assert_eq!(summary.daily[0].precipitation_mm, Decimal::MAX);
        assert_eq!(summary.total_rainfall_mm, Decimal::MAX);
        assert_eq!(summary.average_rainfall_mm, round_dp(Decimal::MAX / Decimal::TWO, 1));
        assert_eq!(summary.rainy_days, 2);
        assert_eq!(summary.daily[0].mean_temperature(), Decimal::from(24));
    }

    #[test]
    fn test_extreme_temperatures_do_not_overflow_mean() {
        let mut heat = vec![sample(1, 9, 0, 0, "clear"), sample(1, 15, 0, 0, "clear")];
        for s in &mut heat {
            s.temperature_celsius = Decimal::MAX;
        }
        let daily = WeatherAggregator::default().daily_forecasts(&heat);
        assert_eq!(daily[0].mean_temperature(), Decimal::MAX / Decimal::TWO);
    }

    #[test]
    fn test_fewer_than_three_days_has_no_windows() {
        let samples = vec![sample(1, 12, 24, 30, "rain"), sample(2, 12, 24, 30, "rain")];
        let summary = WeatherAggregator::default().aggregate("Nashik", &samples);
        assert!(summary.best_planting_periods.is_empty());
        assert_eq!(summary.rainy_days, 2);
    }
}
