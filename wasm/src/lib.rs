//! WebAssembly module for the Farm Intelligence Pipeline
//!
//! Runs the pipeline stages in the browser so the farm app keeps working
//! offline. Every entry point takes and returns JSON strings:
//! - Weather aggregation
//! - Area and suggestion parsing
//! - Yield prediction
//! - Alert derivation and ranking

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::pipeline::{
    AlertEngine, AreaDetectionParser, SuggestionParser, WeatherAggregator, YieldModel,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("farm intelligence pipeline ready"));
}

/// Fold raw forecast samples into a weather summary
#[wasm_bindgen]
pub fn aggregate_weather(location: &str, samples_json: &str) -> Result<String, JsValue> {
    aggregate_weather_json(location, samples_json).map_err(to_js)
}

/// Parse a vision reply into a bounded area measurement
#[wasm_bindgen]
pub fn parse_area(response: &str, area_hint_sqm: Option<f64>) -> Result<String, JsValue> {
    parse_area_json(response, area_hint_sqm).map_err(to_js)
}

/// Parse a text reply into crop suggestions for the given weather summary
#[wasm_bindgen]
pub fn parse_suggestions(response: &str, summary_json: &str) -> Result<String, JsValue> {
    parse_suggestions_json(response, summary_json).map_err(to_js)
}

/// Predict yield for one crop, with optional weather summary
#[wasm_bindgen]
pub fn predict_yield(crop_json: &str, weather_json: Option<String>) -> Result<String, JsValue> {
    predict_yield_json(crop_json, weather_json.as_deref()).map_err(to_js)
}

/// Predict yield for many crops; failed crops are left out
#[wasm_bindgen]
pub fn predict_many(crops_json: &str, weather_json: Option<String>) -> Result<String, JsValue> {
    predict_many_json(crops_json, weather_json.as_deref()).map_err(to_js)
}

/// Derive ranked alerts from an optional summary and optional suggestions
#[wasm_bindgen]
pub fn derive_alerts(
    weather_json: Option<String>,
    suggestions_json: Option<String>,
) -> Result<String, JsValue> {
    derive_alerts_json(weather_json.as_deref(), suggestions_json.as_deref()).map_err(to_js)
}

/// First `count` urgent or warning alerts
#[wasm_bindgen]
pub fn top_alerts(alerts_json: &str, count: usize) -> Result<String, JsValue> {
    top_alerts_json(alerts_json, count).map_err(to_js)
}

/// Check a place name before sending it to the weather provider
#[wasm_bindgen]
pub fn is_valid_location_name(name: &str) -> bool {
    validate_location_name(name).is_ok()
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn decode<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn decode_optional<T: DeserializeOwned>(
    what: &str,
    json: Option<&str>,
) -> Result<Option<T>, String> {
    match json.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(json) => decode(what, json).map(Some),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn aggregate_weather_json(location: &str, samples_json: &str) -> Result<String, String> {
    let samples: Vec<ForecastSample> = decode("samples", samples_json)?;
    encode(&WeatherAggregator::default().aggregate(location, &samples))
}

fn parse_area_json(response: &str, area_hint_sqm: Option<f64>) -> Result<String, String> {
    let hint = area_hint_sqm
        .map(|h| Decimal::try_from(h).map_err(|_| format!("Invalid area hint: {}", h)))
        .transpose()?;
    encode(&AreaDetectionParser::default().detect(response, hint))
}

fn parse_suggestions_json(response: &str, summary_json: &str) -> Result<String, String> {
    let summary: WeatherSummary = decode("weather summary", summary_json)?;
    encode(&SuggestionParser::default().parse(response, &summary))
}

fn predict_yield_json(crop_json: &str, weather_json: Option<&str>) -> Result<String, String> {
    let crop: CropEntity = decode("crop", crop_json)?;
    let weather: Option<WeatherSummary> = decode_optional("weather summary", weather_json)?;

    let prediction = YieldModel::default()
        .predict(&crop, weather.as_ref())
        .map_err(|e| e.to_string())?;
    encode(&prediction)
}

fn predict_many_json(crops_json: &str, weather_json: Option<&str>) -> Result<String, String> {
    let crops: Vec<CropEntity> = decode("crops", crops_json)?;
    let weather: Option<WeatherSummary> = decode_optional("weather summary", weather_json)?;
    encode(&YieldModel::default().predict_many(&crops, weather.as_ref()))
}

fn derive_alerts_json(
    weather_json: Option<&str>,
    suggestions_json: Option<&str>,
) -> Result<String, String> {
    let weather: Option<WeatherSummary> = decode_optional("weather summary", weather_json)?;
    let suggestions: Option<CropSuggestionsResponse> =
        decode_optional("suggestions", suggestions_json)?;
    encode(&AlertEngine::default().derive_alerts(weather.as_ref(), suggestions.as_ref()))
}

fn top_alerts_json(alerts_json: &str, count: usize) -> Result<String, String> {
    let alerts: Vec<Alert> = decode("alerts", alerts_json)?;
    encode(&shared::pipeline::top_alerts(&alerts, count))
}
