//! Prompt builders for the generative AI service

use rust_decimal::Decimal;
use shared::models::WeatherSummary;

/// Prompt asking for crop suggestions grounded in a weather summary
pub fn suggestion_prompt(summary: &WeatherSummary, max_suggestions: usize) -> String {
    let planting_periods = if summary.best_planting_periods.is_empty() {
        "none identified".to_string()
    } else {
        summary.best_planting_periods.join(", ")
    };

    format!(
        r#"You are an agricultural advisor helping a smallholder farmer.

Location: {location}
Current conditions: {current}
Average temperature: {temp}°C
Average humidity: {humidity}%
Average daily rainfall: {avg_rain} mm
Total rainfall: {total_rain} mm
Rainy days: {rainy}
Dry days: {dry}
Best planting periods: {periods}

Suggest up to {max} crops suited to these conditions. Respond with a single JSON object:
{{
  "suggestions": [
    {{
      "cropName": "string",
      "variety": "string",
      "plantingTimeframe": "string",
      "rationale": "string",
      "harvestTimeframe": "string",
      "wateringRequirement": "string",
      "soilPreparation": "string",
      "expectedYield": "string",
      "marketDemand": "High | Medium | Low"
    }}
  ],
  "generalAdvice": "string",
  "riskFactors": ["string"]
}}"#,
        location = summary.location,
        current = summary.current_conditions,
        temp = summary.average_temperature_celsius,
        humidity = summary.average_humidity_percent,
        avg_rain = summary.average_rainfall_mm,
        total_rain = summary.total_rainfall_mm,
        rainy = summary.rainy_days,
        dry = summary.dry_days,
        periods = planting_periods,
        max = max_suggestions,
    )
}

/// Prompt asking the vision model to measure a field
pub fn area_prompt(area_hint_sqm: Option<Decimal>) -> String {
    let hint = match area_hint_sqm {
        Some(hint) => format!("The farmer believes the field is about {} square meters.\n", hint),
        None => String::new(),
    };

    format!(
        r#"Analyze this image of a farm field and estimate its cultivated area.
{hint}Respond with a single JSON object:
{{
  "detectedAreaSqm": number,
  "confidence": number between 0 and 1,
  "cropType": "string or null",
  "description": "string",
  "boundingBox": [{{"x": number, "y": number}}, ... four corners in pixels]
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::pipeline::WeatherAggregator;

    #[test]
    fn test_suggestion_prompt_embeds_summary() {
        let mut summary = WeatherAggregator::default().aggregate("Nashik", &[]);
        summary.best_planting_periods = vec!["2026-10-21–2026-10-23".to_string()];

        let prompt = suggestion_prompt(&summary, 3);

        assert!(prompt.contains("Location: Nashik"));
        assert!(prompt.contains("2026-10-21–2026-10-23"));
        assert!(prompt.contains("up to 3 crops"));
        assert!(prompt.contains("\"riskFactors\""));
    }

    #[test]
    fn test_area_prompt_hint() {
        assert!(area_prompt(Some(Decimal::from(1200))).contains("about 1200 square meters"));
        assert!(!area_prompt(None).contains("believes"));
    }
}
