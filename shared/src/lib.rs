//! Shared types, models and the pure pipeline for the Farm Intelligence Pipeline
//!
//! This crate contains types shared between the backend, the browser (via WASM),
//! and the deterministic pipeline stages both of them run.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
