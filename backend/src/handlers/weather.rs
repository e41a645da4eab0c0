//! HTTP handlers for weather summaries

use axum::{
    extract::{Query, State},
    Json,
};
use shared::models::WeatherSummary;

use crate::error::{AppError, AppResult};
use crate::handlers::LocationInput;
use crate::AppState;

/// Summarize the forecast for a place given by name or coordinates
pub async fn get_weather_summary(
    State(state): State<AppState>,
    Query(place): Query<LocationInput>,
) -> AppResult<Json<WeatherSummary>> {
    let query = place.require_query()?;

    let summary = state
        .weather_service()
        .summarize(&query)
        .await
        .ok_or_else(|| AppError::NotFound("Weather data".to_string()))?;

    Ok(Json(summary))
}
