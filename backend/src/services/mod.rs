//! Services wiring external collaborators to the farm pipeline

pub mod advisory;
pub mod alerts;
pub mod area;
pub mod prompts;
pub mod weather;
pub mod yield_service;

pub use advisory::AdvisoryService;
pub use alerts::{AlertReport, AlertService};
pub use area::AreaDetectionService;
pub use weather::WeatherService;
pub use yield_service::YieldService;
