//! Crop suggestion parsing
//!
//! Replies from the text service are decoded in three tiers, each producing
//! the same [`CropSuggestionsResponse`]:
//!
//! 1. a JSON object with `suggestions`, `generalAdvice` and `riskFactors`
//! 2. crop names mentioned anywhere in the text
//! 3. temperature and rainfall rules over the weather summary
//!
//! Parsing never fails; a reply of pure noise still yields a response.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extract::{
    coerce_string, coerce_string_list, find_vocabulary_terms, first_json_object, title_case,
};
use super::reference::SUGGESTION_CROP_VOCABULARY;
use crate::models::{
    CropSuggestion, CropSuggestionsResponse, DemandTier, SuggestionSource, WeatherSummary,
    MAX_SUGGESTIONS,
};

const GENERIC_ADVICE: &str = "Monitor local weather closely and check with your agricultural \
extension office before committing to a planting schedule.";

const KEYWORD_HIT_LIMIT: usize = 3;

/// Suggestion parsing tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionParserConfig {
    /// Suggestions kept per response, never more than [`MAX_SUGGESTIONS`]
    pub max_suggestions: usize,
    /// Rice needs total forecast rainfall above this. The rule reads the
    /// whole-period total; the yield weather factor and the waterlogging risk
    /// below read the per-day average instead.
    pub rice_min_rainfall_mm: Decimal,
    /// Rice and wheat temperature band (inclusive)
    pub grain_temperature_range: (Decimal, Decimal),
    /// Tomato temperature band (inclusive)
    pub tomato_temperature_range: (Decimal, Decimal),
    /// Average temperature above which heat stress is reported
    pub heat_risk_celsius: Decimal,
    /// Average daily rainfall above which waterlogging is reported
    pub heavy_rain_risk_mm: Decimal,
}

impl Default for SuggestionParserConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            rice_min_rainfall_mm: Decimal::from(50),
            grain_temperature_range: (Decimal::from(20), Decimal::from(30)),
            tomato_temperature_range: (Decimal::from(15), Decimal::from(25)),
            heat_risk_celsius: Decimal::from(35),
            heavy_rain_risk_mm: Decimal::from(20),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionParser {
    config: SuggestionParserConfig,
}

impl SuggestionParser {
    pub fn new(config: SuggestionParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SuggestionParserConfig {
        &self.config
    }

    fn limit(&self) -> usize {
        self.config.max_suggestions.min(MAX_SUGGESTIONS)
    }

    /// Parse a reply, stamping the response with the current time
    pub fn parse(&self, response: &str, summary: &WeatherSummary) -> CropSuggestionsResponse {
        self.parse_at(response, summary, Utc::now())
    }

    /// Parse a reply with an explicit analysis timestamp
    pub fn parse_at(
        &self,
        response: &str,
        summary: &WeatherSummary,
        analyzed_at: DateTime<Utc>,
    ) -> CropSuggestionsResponse {
        let mut parsed = match first_json_object(response) {
            Some(map) => self.parse_structured(&map, summary, analyzed_at),
            None => self
                .parse_keywords(response, summary, analyzed_at)
                .unwrap_or_else(|| {
                    tracing::debug!(
                        location = %summary.location,
                        "no crop names in reply, using rules"
                    );
                    self.rule_based(summary, analyzed_at)
                }),
        };

        parsed.suggestions.truncate(self.limit());
        parsed
    }

    fn parse_structured(
        &self,
        map: &Map<String, Value>,
        summary: &WeatherSummary,
        analyzed_at: DateTime<Utc>,
    ) -> CropSuggestionsResponse {
        let suggestions = match map.get("suggestions") {
            Some(Value::Array(items)) => items.iter().filter_map(decode_suggestion).collect(),
            _ => Vec::new(),
        };

        CropSuggestionsResponse {
            location: summary.location.clone(),
            analyzed_at,
            suggestions,
            general_advice: map
                .get("generalAdvice")
                .and_then(coerce_string)
                .unwrap_or_else(|| GENERIC_ADVICE.to_string()),
            risk_factors: coerce_string_list(map.get("riskFactors")),
            source: SuggestionSource::Structured,
        }
    }

    fn parse_keywords(
        &self,
        response: &str,
        summary: &WeatherSummary,
        analyzed_at: DateTime<Utc>,
    ) -> Option<CropSuggestionsResponse> {
        let hits = find_vocabulary_terms(response, SUGGESTION_CROP_VOCABULARY);
        if hits.is_empty() {
            return None;
        }

        tracing::debug!(hits = hits.len(), "suggestions recovered from crop names in text");

        let suggestions = hits
            .into_iter()
            .take(KEYWORD_HIT_LIMIT)
            .map(|term| CropSuggestion {
                crop_name: title_case(term),
                variety: None,
                planting_timeframe: "Within the next 2-4 weeks".to_string(),
                rationale: format!(
                    "Recommended as suitable for current conditions in {}.",
                    summary.location
                ),
                harvest_timeframe: "Depends on variety".to_string(),
                watering_requirement: "Moderate".to_string(),
                soil_preparation: None,
                expected_yield: None,
                market_demand: Some(DemandTier::Medium),
            })
            .collect();

        Some(CropSuggestionsResponse {
            location: summary.location.clone(),
            analyzed_at,
            suggestions,
            general_advice: GENERIC_ADVICE.to_string(),
            risk_factors: self.summary_risks(summary),
            source: SuggestionSource::Keyword,
        })
    }

    /// Suggestions derived from the summary alone
    pub fn rule_based(
        &self,
        summary: &WeatherSummary,
        analyzed_at: DateTime<Utc>,
    ) -> CropSuggestionsResponse {
        let temperature = summary.average_temperature_celsius;
        let rainfall = summary.total_rainfall_mm;
        let within = |(low, high): (Decimal, Decimal)| temperature >= low && temperature <= high;

        let mut suggestions = Vec::new();

        if within(self.config.grain_temperature_range) {
            if rainfall > self.config.rice_min_rainfall_mm {
                suggestions.push(rule_suggestion(
                    "Rice",
                    "Within 1-2 weeks",
                    "Warm temperatures and plentiful rainfall suit paddy cultivation.",
                    "3-4 months",
                    "High (standing water)",
                    DemandTier::High,
                ));
            } else {
                suggestions.push(rule_suggestion(
                    "Wheat",
                    "Within 2-3 weeks",
                    "Moderate temperatures suit wheat without heavy irrigation.",
                    "4-5 months",
                    "Moderate",
                    DemandTier::High,
                ));
            }
        }

        if within(self.config.tomato_temperature_range) {
            suggestions.push(rule_suggestion(
                "Tomatoes",
                "Within 1-2 weeks",
                "Mild temperatures favour fruit set.",
                "2-3 months",
                "Regular, moderate",
                DemandTier::Medium,
            ));
        }

        CropSuggestionsResponse {
            location: summary.location.clone(),
            analyzed_at,
            suggestions,
            general_advice: GENERIC_ADVICE.to_string(),
            risk_factors: self.summary_risks(summary),
            source: SuggestionSource::RuleBased,
        }
    }

    /// Risk factors readable straight off the summary
    fn summary_risks(&self, summary: &WeatherSummary) -> Vec<String> {
        let mut risks = Vec::new();
        if summary.daily.is_empty() {
            return risks;
        }

        if summary.average_temperature_celsius > self.config.heat_risk_celsius {
            risks.push(format!(
                "Average temperature of {}°C risks heat stress",
                summary.average_temperature_celsius
            ));
        }
        if summary.rainy_days == 0 {
            risks.push("No rain expected in the forecast period; plan irrigation".to_string());
        }
        if summary.average_rainfall_mm > self.config.heavy_rain_risk_mm {
            risks.push(format!(
                "Heavy rainfall averaging {} mm per day; check field drainage",
                summary.average_rainfall_mm
            ));
        }

        risks
    }
}

fn rule_suggestion(
    crop: &str,
    planting: &str,
    rationale: &str,
    harvest: &str,
    watering: &str,
    demand: DemandTier,
) -> CropSuggestion {
    CropSuggestion {
        crop_name: crop.to_string(),
        variety: None,
        planting_timeframe: planting.to_string(),
        rationale: rationale.to_string(),
        harvest_timeframe: harvest.to_string(),
        watering_requirement: watering.to_string(),
        soil_preparation: None,
        expected_yield: None,
        market_demand: Some(demand),
    }
}

/// One entry of the `suggestions` array; entries without a crop name are dropped
fn decode_suggestion(value: &Value) -> Option<CropSuggestion> {
    let item = value.as_object()?;
    let text = |keys: &[&str]| keys.iter().find_map(|k| item.get(*k).and_then(coerce_string));
    let or_unspecified = |v: Option<String>| v.unwrap_or_else(|| "Not specified".to_string());

    Some(CropSuggestion {
        crop_name: text(&["cropName", "crop", "name"])?,
        variety: text(&["variety"]),
        planting_timeframe: or_unspecified(text(&["plantingTimeframe", "plantingTime"])),
        rationale: or_unspecified(text(&["rationale", "reason"])),
        harvest_timeframe: or_unspecified(text(&["harvestTimeframe", "harvestTime"])),
        watering_requirement: or_unspecified(text(&["wateringRequirement", "waterRequirement"])),
        soil_preparation: text(&["soilPreparation"]),
        expected_yield: text(&["expectedYield"]),
        market_demand: text(&["marketDemand"]).and_then(|d| DemandTier::parse(&d)),
    })
}
