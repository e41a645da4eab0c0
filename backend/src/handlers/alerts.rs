//! HTTP handlers for farm alerts

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::LocationInput;
use crate::services::AlertReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertsInput {
    #[serde(flatten)]
    pub place: LocationInput,
    /// Derive advice alerts from crop suggestions as well
    #[serde(default = "default_include_suggestions")]
    pub include_suggestions: bool,
}

fn default_include_suggestions() -> bool {
    true
}

/// Derive ranked alerts for a place
pub async fn get_alerts(
    State(state): State<AppState>,
    Json(input): Json<AlertsInput>,
) -> AppResult<Json<AlertReport>> {
    let weather = match input.place.to_query()? {
        Some(query) => state.weather_service().summarize(&query).await,
        None => None,
    };

    let suggestions = match (&weather, input.include_suggestions) {
        (Some(summary), true) => Some(state.advisory_service().suggest(summary).await),
        _ => None,
    };

    let report = state.alert_service().report(weather.as_ref(), suggestions.as_ref());
    Ok(Json(report))
}
