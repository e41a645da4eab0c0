//! Field area detection models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Area measurement produced from a vision-service response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaDetectionResult {
    /// Detected area in square meters (never negative)
    pub detected_area_sqm: Decimal,
    /// Confidence between 0 and 1
    pub confidence: Decimal,
    pub crop_type: Option<String>,
    pub description: String,
    pub bounding_box: Option<BoundingBox>,
}

impl AreaDetectionResult {
    /// Append a note to the description without discarding what is there
    pub fn append_note(&mut self, note: &str) {
        if self.description.trim().is_empty() {
            self.description = note.to_string();
        } else {
            self.description = format!("{} {}", self.description.trim_end(), note);
        }
    }
}

/// A point in image pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Quadrilateral outline of the detected field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub corners: [PixelPoint; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_note_keeps_existing_text() {
        let mut result = AreaDetectionResult {
            detected_area_sqm: Decimal::from(120),
            confidence: Decimal::new(8, 1),
            crop_type: None,
            description: "Rectangular paddy field.".to_string(),
            bounding_box: None,
        };

        result.append_note("(verify manually)");
        assert_eq!(result.description, "Rectangular paddy field. (verify manually)");
    }

    #[test]
    fn test_append_note_to_empty() {
        let mut result = AreaDetectionResult {
            detected_area_sqm: Decimal::ZERO,
            confidence: Decimal::ZERO,
            crop_type: None,
            description: String::new(),
            bounding_box: None,
        };

        result.append_note("No field found.");
        assert_eq!(result.description, "No field found.");
    }
}
