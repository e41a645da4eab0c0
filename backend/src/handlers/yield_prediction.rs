//! HTTP handlers for yield predictions

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::models::{CropEntity, WeatherSummary, YieldPrediction};
use shared::validation::{validate_batch_size, validate_crop};

use crate::error::{AppError, AppResult};
use crate::external::LocationQuery;
use crate::handlers::LocationInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictYieldInput {
    pub crop: CropEntity,
    /// Overrides the crop's own location for the weather lookup
    #[serde(flatten)]
    pub place: LocationInput,
}

#[derive(Debug, Deserialize)]
pub struct PredictBatchInput {
    pub crops: Vec<CropEntity>,
    #[serde(flatten)]
    pub place: LocationInput,
}

#[derive(Debug, serde::Serialize)]
pub struct PredictBatchResponse {
    pub predictions: Vec<YieldPrediction>,
    pub skipped: usize,
}

/// Predict yield and revenue for one crop
pub async fn predict_yield(
    State(state): State<AppState>,
    Json(input): Json<PredictYieldInput>,
) -> AppResult<Json<YieldPrediction>> {
    validate_crop(&input.crop).map_err(|e| AppError::validation("crop", e))?;

    let fallback = input.crop.location.clone();
    let weather = lookup_weather(&state, &input.place, || crop_query(&fallback)).await?;

    let prediction = state.yield_service().predict(&input.crop, weather.as_ref())?;
    Ok(Json(prediction))
}

/// Predict a batch of crops sharing one weather summary.
///
/// Crops that cannot be predicted are left out and counted in `skipped`.
pub async fn predict_yield_batch(
    State(state): State<AppState>,
    Json(input): Json<PredictBatchInput>,
) -> AppResult<Json<PredictBatchResponse>> {
    validate_batch_size(input.crops.len()).map_err(|e| AppError::validation("crops", e))?;
    for crop in &input.crops {
        validate_crop(crop).map_err(|e| AppError::validation("crops", e))?;
    }

    let fallback = input.crops.first().map(|c| c.location.clone());
    let weather =
        lookup_weather(&state, &input.place, || fallback.as_ref().and_then(crop_query)).await?;

    let requested = input.crops.len();
    let predictions = state.yield_service().predict_many(input.crops, weather).await;
    let skipped = requested - predictions.len();

    Ok(Json(PredictBatchResponse { predictions, skipped }))
}

async fn lookup_weather(
    state: &AppState,
    place: &LocationInput,
    fallback: impl FnOnce() -> Option<LocationQuery>,
) -> AppResult<Option<WeatherSummary>> {
    let query = match place.to_query()? {
        Some(query) => Some(query),
        None => fallback(),
    };

    Ok(match query {
        Some(query) => state.weather_service().summarize(&query).await,
        None => None,
    })
}

fn crop_query(location: &shared::types::Location) -> Option<LocationQuery> {
    if let Some(coords) = location.coordinates {
        return Some(LocationQuery::Coordinates(coords));
    }
    let name = location.name.trim();
    (!name.is_empty()).then(|| LocationQuery::Name(name.to_string()))
}
