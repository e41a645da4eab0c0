//! Route definitions for the Farm Intelligence Pipeline

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .route("/suggestions", post(handlers::suggest_crops))
        .nest("/area", area_routes())
        .nest("/yield", yield_routes())
        .route("/alerts", post(handlers::get_alerts))
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new().route("/summary", get(handlers::get_weather_summary))
}

/// Field area routes
fn area_routes() -> Router<AppState> {
    Router::new().route("/detect", post(handlers::detect_area))
}

/// Yield prediction routes
fn yield_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict_yield))
        .route("/predict-batch", post(handlers::predict_yield_batch))
}
