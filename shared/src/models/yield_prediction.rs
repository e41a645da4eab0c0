//! Yield prediction models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Predicted harvest for one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldPrediction {
    pub crop_id: Uuid,
    /// Whole kilograms
    pub predicted_yield_kg: Decimal,
    /// Whole currency units
    pub predicted_revenue: Decimal,
    /// Two decimals, between 0.2 and 1
    pub confidence: Decimal,
    pub factors: YieldFactors,
    pub metadata: PredictionMetadata,
}

/// Multiplicative adjustments applied to the base yield
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldFactors {
    pub area: Decimal,
    pub crop_type: Decimal,
    pub weather: Decimal,
    pub investment: Decimal,
    pub location: Decimal,
}

impl YieldFactors {
    /// Product of every factor, unclamped
    pub fn product(&self) -> Decimal {
        self.area * self.crop_type * self.weather * self.investment * self.location
    }
}

/// How a prediction was produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionMetadata {
    pub model_name: String,
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
    pub assumptions: Vec<String>,
}
