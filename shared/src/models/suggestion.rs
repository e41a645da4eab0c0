//! Crop suggestion models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard ceiling on suggestions carried by a response
pub const MAX_SUGGESTIONS: usize = 5;

/// A single crop planting suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropSuggestion {
    pub crop_name: String,
    pub variety: Option<String>,
    pub planting_timeframe: String,
    pub rationale: String,
    pub harvest_timeframe: String,
    pub watering_requirement: String,
    pub soil_preparation: Option<String>,
    pub expected_yield: Option<String>,
    pub market_demand: Option<DemandTier>,
}

/// Market demand tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DemandTier {
    High,
    Medium,
    Low,
}

impl DemandTier {
    /// Lenient parse of a tier label, e.g. "high" or "Medium demand"
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label.starts_with("high") {
            Some(DemandTier::High)
        } else if label.starts_with("medium") || label.starts_with("moderate") {
            Some(DemandTier::Medium)
        } else if label.starts_with("low") {
            Some(DemandTier::Low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for DemandTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandTier::High => write!(f, "High"),
            DemandTier::Medium => write!(f, "Medium"),
            DemandTier::Low => write!(f, "Low"),
        }
    }
}

/// Which parsing tier produced a suggestions response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Structured,
    Keyword,
    RuleBased,
}

/// Suggestions for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropSuggestionsResponse {
    pub location: String,
    pub analyzed_at: DateTime<Utc>,
    pub suggestions: Vec<CropSuggestion>,
    pub general_advice: String,
    pub risk_factors: Vec<String>,
    pub source: SuggestionSource,
}
