//! Heuristic yield and revenue model
//!
//! `predicted yield = area x reference yield x clamp(product of factors)`,
//! with every factor a coarse step function. Figures are plausible and
//! explainable rather than calibrated; the assumptions used are listed in
//! the prediction metadata.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reference::{baseline_reference, find_crop, CropDifficulty, CropReference};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    AreaSource, CropEntity, PredictionMetadata, WeatherSummary, YieldFactors, YieldPrediction,
};
use crate::types::{round_dp, BoundingRegion};

pub const MODEL_NAME: &str = "farm-heuristic-yield";
pub const MODEL_VERSION: &str = "1.0.0";

/// Coordinates earning a location bonus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldRegion {
    pub name: String,
    pub bounds: BoundingRegion,
    pub factor: Decimal,
}

impl YieldRegion {
    fn new(name: &str, lat: (i64, i64), lon: (i64, i64), scale: u32, factor: Decimal) -> Self {
        Self {
            name: name.to_string(),
            bounds: BoundingRegion {
                min_latitude: Decimal::new(lat.0, scale),
                max_latitude: Decimal::new(lat.1, scale),
                min_longitude: Decimal::new(lon.0, scale),
                max_longitude: Decimal::new(lon.1, scale),
            },
            factor,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldModelConfig {
    /// Area assumed when a crop records none
    pub default_area_sqm: Decimal,
    /// Checked in order; the first containing region wins
    pub regions: Vec<YieldRegion>,
    pub min_total_factor: Decimal,
    pub max_total_factor: Decimal,
}

impl Default for YieldModelConfig {
    fn default() -> Self {
        Self {
            default_area_sqm: Decimal::from(1000),
            regions: vec![
                YieldRegion::new(
                    "Punjab-Haryana plains",
                    (280, 320),
                    (730, 780),
                    1,
                    Decimal::new(12, 1),
                ),
                YieldRegion::new("Gangetic delta", (215, 270), (850, 890), 1, Decimal::new(11, 1)),
                YieldRegion::new(
                    "Deccan river basins",
                    (150, 195),
                    (780, 825),
                    1,
                    Decimal::new(105, 2),
                ),
            ],
            min_total_factor: Decimal::new(3, 1),
            max_total_factor: Decimal::TWO,
        }
    }
}

/// Deterministic yield model
#[derive(Debug, Clone, Default)]
pub struct YieldModel {
    config: YieldModelConfig,
}

impl YieldModel {
    pub fn new(config: YieldModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YieldModelConfig {
        &self.config
    }

    pub fn predict(
        &self,
        crop: &CropEntity,
        weather: Option<&WeatherSummary>,
    ) -> PipelineResult<YieldPrediction> {
        self.predict_at(crop, weather, Utc::now())
    }

    pub fn predict_at(
        &self,
        crop: &CropEntity,
        weather: Option<&WeatherSummary>,
        computed_at: DateTime<Utc>,
    ) -> PipelineResult<YieldPrediction> {
        if crop.id.is_nil() {
            return Err(PipelineError::InvalidEntity {
                crop_id: crop.id,
                reason: "crop has no identifier".to_string(),
            });
        }

        let overflow = |stage: &'static str| PipelineError::Overflow { crop_id: crop.id, stage };
        let mut assumptions = Vec::new();

        // Reference figures
        let reference = match find_crop(&crop.crop_type) {
            Some(reference) => reference,
            None => {
                assumptions.push(format!(
                    "Unknown crop type '{}'; using the {} baseline",
                    crop.crop_type.trim(),
                    baseline_reference().name
                ));
                baseline_reference()
            }
        };
        assumptions.push(format!(
            "Reference yield {} kg/sqm at {} per kg ({})",
            reference.yield_kg_per_sqm, reference.price_per_kg, reference.name
        ));

        // Area
        let (area, area_source) = crop
            .effective_area()
            .unwrap_or((self.config.default_area_sqm, AreaSource::Default));
        assumptions.push(match area_source {
            AreaSource::Detected => format!("Area {} sqm detected from imagery", area),
            AreaSource::Declared => format!("Area {} sqm as declared", area),
            AreaSource::Default => format!("No area recorded; assuming {} sqm", area),
        });

        let base_yield = area
            .checked_mul(reference.yield_kg_per_sqm)
            .ok_or_else(|| overflow("base yield"))?;

        // Factors
        let investment = crop.investment_amount.max(Decimal::ZERO);
        let investment_per_sqm = investment
            .checked_div(area)
            .ok_or_else(|| overflow("investment ratio"))?;

        let observed = weather.filter(|w| w.has_observation());
        if observed.is_none() {
            assumptions.push("No weather data; weather factor neutral".to_string());
        }

        let factors = YieldFactors {
            area: area_factor(area),
            crop_type: crop_type_factor(reference),
            weather: observed.map_or(Decimal::ONE, weather_factor),
            investment: investment_factor(investment_per_sqm),
            location: self.location_factor(crop, &mut assumptions),
        };

        let product = factors.product();
        let total_factor =
            product.clamp(self.config.min_total_factor, self.config.max_total_factor);
        if total_factor != product {
            assumptions.push(format!(
                "Combined factor {} clamped to {}",
                round_dp(product, 3),
                total_factor
            ));
        }

        let predicted_yield = round_dp(
            base_yield
                .checked_mul(total_factor)
                .ok_or_else(|| overflow("predicted yield"))?,
            0,
        );
        let predicted_revenue = round_dp(
            predicted_yield
                .checked_mul(reference.price_per_kg)
                .ok_or_else(|| overflow("predicted revenue"))?,
            0,
        );

        Ok(YieldPrediction {
            crop_id: crop.id,
            predicted_yield_kg: predicted_yield.max(Decimal::ZERO),
            predicted_revenue: predicted_revenue.max(Decimal::ZERO),
            confidence: confidence(crop, area_source, investment, observed.is_some()),
            factors,
            metadata: PredictionMetadata {
                model_name: MODEL_NAME.to_string(),
                model_version: MODEL_VERSION.to_string(),
                computed_at,
                assumptions,
            },
        })
    }

    /// Predict every crop independently, keeping only the successes in input order
    pub fn predict_many(
        &self,
        crops: &[CropEntity],
        weather: Option<&WeatherSummary>,
    ) -> Vec<YieldPrediction> {
        let computed_at = Utc::now();

        crops
            .iter()
            .filter_map(|crop| match self.predict_at(crop, weather, computed_at) {
                Ok(prediction) => Some(prediction),
                Err(e) => {
                    tracing::warn!(
                        crop_id = %crop.id,
                        error = %e,
                        "Yield prediction failed, skipping crop"
                    );
                    None
                }
            })
            .collect()
    }

    fn location_factor(&self, crop: &CropEntity, assumptions: &mut Vec<String>) -> Decimal {
        let Some(coords) = crop.location.coordinates else {
            return Decimal::ONE;
        };

        match self.config.regions.iter().find(|r| coords.is_within(&r.bounds)) {
            Some(region) => {
                assumptions.push(format!("Location bonus x{} ({})", region.factor, region.name));
                region.factor
            }
            None => Decimal::ONE,
        }
    }
}

fn area_factor(area: Decimal) -> Decimal {
    if area < Decimal::from(500) {
        Decimal::new(8, 1)
    } else if area < Decimal::from(1000) {
        Decimal::new(9, 1)
    } else if area < Decimal::from(5000) {
        Decimal::ONE
    } else if area < Decimal::from(20000) {
        Decimal::new(11, 1)
    } else {
        Decimal::new(115, 2)
    }
}

fn crop_type_factor(reference: &CropReference) -> Decimal {
    match reference.difficulty {
        CropDifficulty::Easy => Decimal::new(11, 1),
        CropDifficulty::Medium => Decimal::ONE,
        CropDifficulty::Hard => Decimal::new(9, 1),
    }
}

/// Expects a summary with a current observation
fn weather_factor(summary: &WeatherSummary) -> Decimal {
    let Some(current) = summary.current.as_ref() else {
        return Decimal::ONE;
    };

    let mut factor = Decimal::ONE;

    let temp = current.temperature_celsius;
    if temp >= Decimal::from(20) && temp <= Decimal::from(30) {
        factor *= Decimal::new(11, 1);
    } else if temp < Decimal::from(10) || temp > Decimal::from(40) {
        factor *= Decimal::new(7, 1);
    } else {
        factor *= Decimal::new(9, 1);
    }

    let humidity = current.humidity_percent;
    if humidity >= Decimal::from(50) && humidity <= Decimal::from(70) {
        factor *= Decimal::new(105, 2);
    } else if humidity < Decimal::from(30) || humidity > Decimal::from(90) {
        factor *= Decimal::new(85, 2);
    }

    let rainfall = summary.average_rainfall_mm;
    if rainfall >= Decimal::TWO && rainfall <= Decimal::from(10) {
        factor *= Decimal::new(11, 1);
    } else if rainfall < Decimal::new(5, 1) || rainfall > Decimal::from(20) {
        factor *= Decimal::new(8, 1);
    }

    factor.clamp(Decimal::new(5, 1), Decimal::new(15, 1))
}

fn investment_factor(per_sqm: Decimal) -> Decimal {
    if per_sqm < Decimal::from(5) {
        Decimal::new(7, 1)
    } else if per_sqm < Decimal::from(10) {
        Decimal::new(85, 2)
    } else if per_sqm < Decimal::from(20) {
        Decimal::ONE
    } else if per_sqm < Decimal::from(50) {
        Decimal::new(11, 1)
    } else {
        Decimal::new(125, 2)
    }
}

fn confidence(
    crop: &CropEntity,
    area_source: AreaSource,
    investment: Decimal,
    has_weather: bool,
) -> Decimal {
    let bonus = Decimal::new(1, 1);
    let mut confidence = Decimal::new(5, 1);

    confidence += match area_source {
        AreaSource::Detected => Decimal::new(2, 1),
        AreaSource::Declared => bonus,
        AreaSource::Default => Decimal::ZERO,
    };
    if crop.has_details() {
        confidence += bonus;
    }
    if crop.location.coordinates.is_some() {
        confidence += bonus;
    }
    if investment > Decimal::ZERO {
        confidence += bonus;
    }
    if has_weather {
        confidence += bonus;
    }

    round_dp(confidence.clamp(Decimal::new(2, 1), Decimal::ONE), 2)
}
