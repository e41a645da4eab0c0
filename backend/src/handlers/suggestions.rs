//! HTTP handlers for crop suggestions

use axum::{extract::State, Json};
use shared::models::CropSuggestionsResponse;

use crate::error::AppResult;
use crate::handlers::LocationInput;
use crate::AppState;

/// Suggest crops for a place.
///
/// Without forecast data the suggestions are built from an empty summary, so
/// the caller always receives a response.
pub async fn suggest_crops(
    State(state): State<AppState>,
    Json(place): Json<LocationInput>,
) -> AppResult<Json<CropSuggestionsResponse>> {
    let query = place.require_query()?;
    let weather = state.weather_service();

    let summary = match weather.summarize(&query).await {
        Some(summary) => summary,
        None => state.empty_summary(&place.label()),
    };

    let response = state.advisory_service().suggest(&summary).await;
    Ok(Json(response))
}
