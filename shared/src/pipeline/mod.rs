//! The farm intelligence pipeline
//!
//! Pure, synchronous stages over already-resolved inputs:
//! forecast aggregation, AI reply parsing, yield modelling and alerting.

pub mod alert_engine;
pub mod area_detection;
pub mod extract;
pub mod reference;
pub mod suggestion_parser;
pub mod weather_aggregator;
pub mod yield_model;

pub use alert_engine::{rank_alerts, top_alerts, AlertEngine, AlertThresholds};
pub use area_detection::{AreaDetectionConfig, AreaDetectionParser};
pub use suggestion_parser::{SuggestionParser, SuggestionParserConfig};
pub use weather_aggregator::{AggregatorConfig, PlantingWindowCriteria, WeatherAggregator};
pub use yield_model::{YieldModel, YieldModelConfig, YieldRegion};
