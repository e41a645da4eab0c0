//! Pipeline error types

use thiserror::Error;
use uuid::Uuid;

/// Failures the yield model can report for a single crop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Arithmetic overflow computing {stage} for crop {crop_id}")]
    Overflow { crop_id: Uuid, stage: &'static str },

    #[error("Invalid crop {crop_id}: {reason}")]
    InvalidEntity { crop_id: Uuid, reason: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
