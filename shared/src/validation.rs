//! Validation utilities for farm pipeline requests

use rust_decimal::Decimal;

use crate::models::CropEntity;
use crate::types::GpsCoordinates;

/// Image formats the vision service accepts
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Crops accepted in one batch prediction request
pub const MAX_BATCH_SIZE: usize = 100;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude and longitude ranges
pub fn validate_coordinates(coords: &GpsCoordinates) -> Result<(), &'static str> {
    if coords.latitude < Decimal::from(-90) || coords.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coords.longitude < Decimal::from(-180) || coords.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a location name used for weather lookups
pub fn validate_location_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Location cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Location must be at most 100 characters");
    }
    Ok(())
}

// ============================================================================
// Crop Validations
// ============================================================================

/// Declared and detected areas may be absent but never negative
pub fn validate_declared_area(area_sqm: Option<Decimal>) -> Result<(), &'static str> {
    match area_sqm {
        Some(area) if area < Decimal::ZERO => Err("Area cannot be negative"),
        _ => Ok(()),
    }
}

/// An area hint, when given, must be positive
pub fn validate_area_hint(hint_sqm: Decimal) -> Result<(), &'static str> {
    if hint_sqm <= Decimal::ZERO {
        return Err("Area hint must be greater than zero");
    }
    Ok(())
}

/// Validate the fields of a crop submitted for prediction
pub fn validate_crop(crop: &CropEntity) -> Result<(), &'static str> {
    if crop.crop_type.trim().is_empty() {
        return Err("Crop type cannot be empty");
    }
    validate_declared_area(crop.area_sqm)?;
    validate_declared_area(crop.detected_area_sqm)?;
    if let Some(coords) = crop.location.coordinates.as_ref() {
        validate_coordinates(coords)?;
    }
    Ok(())
}

/// Validate batch prediction size
pub fn validate_batch_size(count: usize) -> Result<(), &'static str> {
    if count == 0 {
        return Err("At least one crop is required");
    }
    if count > MAX_BATCH_SIZE {
        return Err("Too many crops in one request");
    }
    Ok(())
}

// ============================================================================
// Image Validations
// ============================================================================

/// Check the image MIME type is one the vision service accepts
pub fn validate_image_mime_type(mime_type: &str) -> Result<(), &'static str> {
    let normalized = mime_type.trim().to_lowercase();
    if SUPPORTED_IMAGE_TYPES.contains(&normalized.as_str()) {
        Ok(())
    } else {
        Err("Image must be JPEG, PNG or WebP")
    }
}
