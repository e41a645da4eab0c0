//! HTTP handlers for field area detection

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::AreaDetectionResult;
use shared::validation::{validate_area_hint, validate_image_mime_type};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DetectAreaInput {
    /// Field photo, base64 encoded
    pub image_base64: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Farmer's own estimate, used when the image cannot be measured
    pub area_hint_sqm: Option<Decimal>,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

/// Measure a field from an uploaded photo
pub async fn detect_area(
    State(state): State<AppState>,
    Json(input): Json<DetectAreaInput>,
) -> AppResult<Json<AreaDetectionResult>> {
    validate_image_mime_type(&input.mime_type).map_err(|e| AppError::validation("mime_type", e))?;
    if let Some(hint) = input.area_hint_sqm {
        validate_area_hint(hint).map_err(|e| AppError::validation("area_hint_sqm", e))?;
    }

    let image = STANDARD
        .decode(input.image_base64.trim())
        .map_err(|_| AppError::validation("image_base64", "Image is not valid base64"))?;
    if image.is_empty() {
        return Err(AppError::validation("image_base64", "Image is empty"));
    }

    let result = state
        .area_service()
        .detect(&image, &input.mime_type, input.area_hint_sqm)
        .await;

    Ok(Json(result))
}
