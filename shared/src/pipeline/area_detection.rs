//! Field area detection parsing
//!
//! Turns a vision-service reply into an [`AreaDetectionResult`]. A JSON
//! object anywhere in the reply is decoded field by field; without one the
//! raw text is scanned for area figures. [`AreaDetectionParser::validate`]
//! then bounds the figures, annotating the description whenever it does.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extract::{
    coerce_decimal, coerce_string, find_vocabulary_term, first_json_object, parse_decimal,
    title_case,
};
use super::reference::AREA_CROP_VOCABULARY;
use crate::models::{AreaDetectionResult, BoundingBox, PixelPoint};

const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?)";

static SQUARE_METERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){NUMBER}\s*(?:square\s*met(?:er|re)s?|sq\.?\s*m\b|sqm\b|m²|m2\b)"
    ))
    .expect("square meter pattern is valid")
});

static AREA_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\barea\s*[:=]\s*{NUMBER}")).expect("area label pattern is valid")
});

static HECTARES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){NUMBER}\s*(?:hectares?|ha\b)")).expect("hectare pattern is valid")
});

const SQM_PER_HECTARE: i64 = 10_000;

/// Area detection tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaDetectionConfig {
    /// Ceiling applied by `validate` (100,000 sqm is roughly 10 hectares)
    pub max_area_sqm: Decimal,
    /// Confidence cap when the ceiling was applied
    pub clamped_confidence_cap: Decimal,
    /// Areas below this are treated as suspicious
    pub small_area_threshold_sqm: Decimal,
    pub small_area_confidence_cap: Decimal,
    /// Share of the declared area used when nothing was detected
    pub hint_ratio: Decimal,
}

impl Default for AreaDetectionConfig {
    fn default() -> Self {
        Self {
            max_area_sqm: Decimal::from(100_000),
            clamped_confidence_cap: Decimal::new(5, 1),
            small_area_threshold_sqm: Decimal::from(10),
            small_area_confidence_cap: Decimal::new(3, 1),
            hint_ratio: Decimal::new(8, 1),
        }
    }
}

/// Parser for vision-service area replies
#[derive(Debug, Clone, Default)]
pub struct AreaDetectionParser {
    config: AreaDetectionConfig,
}

impl AreaDetectionParser {
    pub fn new(config: AreaDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AreaDetectionConfig {
        &self.config
    }

    /// Parse then validate
    pub fn detect(&self, response: &str, area_hint: Option<Decimal>) -> AreaDetectionResult {
        self.validate(self.parse(response, area_hint))
    }

    /// Parse a reply; never fails, however malformed the text
    pub fn parse(&self, response: &str, area_hint: Option<Decimal>) -> AreaDetectionResult {
        let hint = area_hint.filter(|h| *h > Decimal::ZERO);

        match first_json_object(response) {
            Some(map) => self.parse_structured(&map, hint),
            None => {
                tracing::debug!("no JSON object in vision reply, scanning text");
                self.parse_unstructured(response, hint)
            }
        }
    }

    fn parse_structured(
        &self,
        map: &Map<String, Value>,
        hint: Option<Decimal>,
    ) -> AreaDetectionResult {
        let field = |name: &str| map.get(name);

        let mut result = AreaDetectionResult {
            detected_area_sqm: field("detectedAreaSqm")
                .and_then(coerce_decimal)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
            confidence: field("confidence")
                .and_then(coerce_decimal)
                .unwrap_or(Decimal::new(5, 1))
                .clamp(Decimal::ZERO, Decimal::ONE),
            crop_type: field("cropType").and_then(coerce_string),
            description: field("description")
                .and_then(coerce_string)
                .unwrap_or_default(),
            bounding_box: field("boundingBox").and_then(parse_bounding_box),
        };

        if result.detected_area_sqm.is_zero() {
            if let Some(hint) = hint {
                result.detected_area_sqm = self.scaled_hint(hint);
                result.confidence = Decimal::new(3, 1);
                result.append_note("(No area detected; estimated from the declared field size.)");
            }
        }

        result
    }

    fn parse_unstructured(&self, response: &str, hint: Option<Decimal>) -> AreaDetectionResult {
        let hectare_scale = Decimal::from(SQM_PER_HECTARE);

        let candidates = SQUARE_METERS
            .captures_iter(response)
            .chain(AREA_LABEL.captures_iter(response))
            .filter_map(|caps| parse_decimal(caps.get(1)?.as_str()))
            .chain(
                HECTARES
                    .captures_iter(response)
                    .filter_map(|caps| parse_decimal(caps.get(1)?.as_str()))
                    .filter_map(|ha| ha.checked_mul(hectare_scale)),
            );

        let best = candidates.max();
        let crop_type = find_vocabulary_term(response, AREA_CROP_VOCABULARY).map(title_case);

        let mut result = match best {
            Some(area) => AreaDetectionResult {
                detected_area_sqm: area.max(Decimal::ZERO),
                confidence: Decimal::new(4, 1),
                crop_type,
                description: "Area extracted from an unstructured response.".to_string(),
                bounding_box: None,
            },
            None => AreaDetectionResult {
                detected_area_sqm: Decimal::ZERO,
                confidence: Decimal::new(3, 1),
                crop_type,
                description: "No area figure found in the response.".to_string(),
                bounding_box: None,
            },
        };

        if result.detected_area_sqm.is_zero() {
            if let Some(hint) = hint {
                result.detected_area_sqm = self.scaled_hint(hint);
                result.confidence = Decimal::new(2, 1);
                result.append_note("(Estimated from the declared field size.)");
            }
        }

        result
    }

    /// Share of the declared size assumed planted; overflow saturates and is capped later
    fn scaled_hint(&self, hint: Decimal) -> Decimal {
        hint.checked_mul(self.config.hint_ratio)
            .map(|area| area.normalize())
            .unwrap_or(Decimal::MAX)
    }

    /// Bound area and confidence, noting every adjustment in the description
    pub fn validate(&self, mut result: AreaDetectionResult) -> AreaDetectionResult {
        result.detected_area_sqm = result.detected_area_sqm.max(Decimal::ZERO);
        result.confidence = result.confidence.clamp(Decimal::ZERO, Decimal::ONE);

        if result.detected_area_sqm > self.config.max_area_sqm {
            result.detected_area_sqm = self.config.max_area_sqm;
            result.confidence = result.confidence.min(self.config.clamped_confidence_cap);
            result.append_note(&format!(
                "(Area capped at the {} sqm maximum; the detected value was larger.)",
                self.config.max_area_sqm
            ));
        }

        if result.detected_area_sqm < self.config.small_area_threshold_sqm {
            result.confidence = result.confidence.min(self.config.small_area_confidence_cap);
            result.append_note(&format!(
                "(Area below {} sqm; please verify the measurement.)",
                self.config.small_area_threshold_sqm
            ));
        }

        result
    }
}

/// Four corners given as `{"x":..,"y":..}` objects or `[x, y]` pairs
fn parse_bounding_box(value: &Value) -> Option<BoundingBox> {
    let items = value.as_array()?;
    if items.len() != 4 {
        return None;
    }

    let mut corners = [PixelPoint { x: 0.0, y: 0.0 }; 4];
    for (slot, item) in corners.iter_mut().zip(items) {
        let (x, y) = match item {
            Value::Object(point) => (point.get("x")?, point.get("y")?),
            Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
            _ => return None,
        };
        *slot = PixelPoint {
            x: coerce_decimal(x)?.to_f64()?,
            y: coerce_decimal(y)?.to_f64()?,
        };
    }

    Some(BoundingBox { corners })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> AreaDetectionParser {
        AreaDetectionParser::default()
    }

    #[test]
    fn test_unstructured_square_meters_with_crop() {
        let result = parser().parse(
            "I found a field of about 1500 square meters of tomatoes",
            None,
        );

        assert_eq!(result.detected_area_sqm, Decimal::from(1500));
        assert_eq!(result.crop_type.as_deref(), Some("Tomato"));
        assert_eq!(result.confidence, Decimal::new(4, 1));
    }

    #[test]
    fn test_unstructured_crop_inside_word() {
        let result = parser().parse("About 800 sqm of sweetcorn", None);
        assert_eq!(result.crop_type.as_deref(), Some("Corn"));
        assert_eq!(result.detected_area_sqm, Decimal::from(800));
    }

    #[test]
    fn test_unstructured_takes_largest_figure() {
        let result = parser().parse(
            "One plot is 200 sqm, the whole farm is 0.5 hectares, area: 900",
            None,
        );
        assert_eq!(result.detected_area_sqm, Decimal::from(5000));
    }

    #[test]
    fn test_unstructured_thousands_separator() {
        let result = parser().parse("roughly 2,400 m² of wheat", None);
        assert_eq!(result.detected_area_sqm, Decimal::from(2400));
        assert_eq!(result.crop_type.as_deref(), Some("Wheat"));
    }

    #[test]
    fn test_unstructured_nothing_found() {
        let result = parser().parse("The image is too blurry to tell.", None);
        assert_eq!(result.detected_area_sqm, Decimal::ZERO);
        assert_eq!(result.confidence, Decimal::new(3, 1));
        assert!(result.crop_type.is_none());
    }

    #[test]
    fn test_unstructured_hint_fallback() {
        let result = parser().parse("Cannot see the field.", Some(Decimal::from(1000)));
        assert_eq!(result.detected_area_sqm, Decimal::from(800));
        assert_eq!(result.confidence, Decimal::new(2, 1));
        assert!(result.description.contains("declared field size"));
    }

    #[test]
    fn test_structured_fields() {
        let text = r#"```json
{
  "detectedAreaSqm": "2500",
  "confidence": 0.85,
  "cropType": "Rice",
  "description": "Flooded paddy with clear bunds.",
  "boundingBox": [{"x": 10, "y": 20}, [300, 20], {"x": 300, "y": 240}, [10, 240]]
}
```"#;
        let result = parser().parse(text, None);

        assert_eq!(result.detected_area_sqm, Decimal::from(2500));
        assert_eq!(result.confidence, Decimal::new(85, 2));
        assert_eq!(result.crop_type.as_deref(), Some("Rice"));
        assert_eq!(result.description, "Flooded paddy with clear bunds.");
        let bbox = result.bounding_box.unwrap();
        assert_eq!(bbox.corners[1], PixelPoint { x: 300.0, y: 20.0 });
    }

    #[test]
    fn test_structured_defaults_and_clamps() {
        let result = parser().parse(r#"{"detectedAreaSqm": -40, "confidence": "high"}"#, None);
        assert_eq!(result.detected_area_sqm, Decimal::ZERO);
        assert_eq!(result.confidence, Decimal::new(5, 1));
        assert!(result.crop_type.is_none());
        assert!(result.bounding_box.is_none());

        let result = parser().parse(r#"{"detectedAreaSqm": 50, "confidence": 7}"#, None);
        assert_eq!(result.confidence, Decimal::ONE);
    }

    #[test]
    fn test_structured_zero_area_uses_hint() {
        let result = parser().parse(
            r#"{"detectedAreaSqm": 0, "confidence": 0.9, "description": "Field edges unclear."}"#,
            Some(Decimal::from(2000)),
        );
        assert_eq!(result.detected_area_sqm, Decimal::from(1600));
        assert_eq!(result.confidence, Decimal::new(3, 1));
        assert!(result.description.starts_with("Field edges unclear."));
    }

    #[test]
    fn test_bad_bounding_box_is_dropped() {
        let result = parser().parse(
            r#"{"detectedAreaSqm": 100, "boundingBox": [{"x": 1, "y": 2}]}"#,
            None,
        );
        assert!(result.bounding_box.is_none());
    }

    #[test]
    fn test_validate_caps_large_area() {
        let result = parser().detect(r#"{"detectedAreaSqm": 250000, "confidence": 0.9}"#, None);
        assert_eq!(result.detected_area_sqm, Decimal::from(100_000));
        assert_eq!(result.confidence, Decimal::new(5, 1));
        assert!(result.description.contains("100000 sqm maximum"));
    }

    #[test]
    fn test_validate_flags_small_area() {
        let result = parser().detect(r#"{"detectedAreaSqm": 4, "confidence": 0.9}"#, None);
        assert_eq!(result.detected_area_sqm, Decimal::from(4));
        assert_eq!(result.confidence, Decimal::new(3, 1));
        assert!(result.description.contains("verify"));
    }

    #[test]
    fn test_validate_leaves_normal_result_alone() {
        let parsed = parser().parse(r#"{"detectedAreaSqm": 640, "confidence": 0.7, "description": "ok"}"#, None);
        let validated = parser().validate(parsed.clone());
        assert_eq!(parsed, validated);
    }

    #[test]
    fn test_custom_ceiling() {
        let parser = AreaDetectionParser::new(AreaDetectionConfig {
            max_area_sqm: Decimal::from(5000),
            ..AreaDetectionConfig::default()
        });
        let result = parser.detect("about 3 hectares", None);
        assert_eq!(result.detected_area_sqm, Decimal::from(5000));
        assert_eq!(result.confidence, Decimal::new(4, 1));
    }

    #[test]
    fn test_parse_is_repeatable() {
        let text = "Maybe 1,200 sqm of maize, area: 1100";
        let first = parser().parse(text, Some(Decimal::from(900)));
        let second = parser().parse(text, Some(Decimal::from(900)));
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
