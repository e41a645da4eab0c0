//! Crop entity models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Location;

/// A crop planted by a farmer, as supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropEntity {
    pub id: Uuid,
    pub crop_type: String,
    pub variety: Option<String>,
    pub location: Location,
    /// Area declared by the farmer
    pub area_sqm: Option<Decimal>,
    /// Area measured from imagery; preferred when present
    pub detected_area_sqm: Option<Decimal>,
    #[serde(default)]
    pub investment_amount: Decimal,
    pub planting_date: Option<NaiveDate>,
    /// Free-text details entered by the farmer
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CropStatus,
}

/// Crop lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    #[default]
    Active,
    Harvested,
    Failed,
}

/// Which area figure the yield model used
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AreaSource {
    Detected,
    Declared,
    Default,
}

impl CropEntity {
    /// Resolve the area to model with; non-positive figures count as missing
    pub fn effective_area(&self) -> Option<(Decimal, AreaSource)> {
        let positive = |v: &Option<Decimal>| v.filter(|a| *a > Decimal::ZERO);

        positive(&self.detected_area_sqm)
            .map(|a| (a, AreaSource::Detected))
            .or_else(|| positive(&self.area_sqm).map(|a| (a, AreaSource::Declared)))
    }

    /// True when both the free-text details and the variety are filled in
    pub fn has_details(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.notes) && filled(&self.variety)
    }
}

impl std::fmt::Display for CropStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropStatus::Active => write!(f, "Active"),
            CropStatus::Harvested => write!(f, "Harvested"),
            CropStatus::Failed => write!(f, "Failed"),
        }
    }
}
