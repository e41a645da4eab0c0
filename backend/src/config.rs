//! Configuration management for the Farm Intelligence Pipeline
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FIP_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::pipeline::{
    AggregatorConfig, AlertThresholds, AreaDetectionConfig, SuggestionParserConfig,
    YieldModelConfig,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Generative AI service configuration
    pub ai: AiConfig,

    /// Pipeline tuning
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; empty disables weather lookups
    pub api_key: String,

    /// Unit system requested from the provider
    pub units: String,
}

impl WeatherConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Generative API base endpoint
    pub api_endpoint: String,

    /// Generative API key; empty disables AI calls
    pub api_key: String,

    /// Model used for both text and vision requests
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineSettings {
    /// Largest area a detection may report
    pub area_ceiling_sqm: Decimal,

    /// Area assumed for crops without one
    pub default_area_sqm: Decimal,

    /// Suggestions kept per response
    pub max_suggestions: usize,

    /// Alerts shown on the dashboard
    pub top_alert_count: usize,

    /// Daily precipitation above which a day counts as rainy
    pub rainy_day_threshold_mm: Decimal,

    /// Temperature above which a heat alert fires
    pub heat_alert_celsius: Decimal,

    /// Rain over the alert window above which a heavy rain alert fires
    pub heavy_rain_alert_mm: Decimal,
}

impl PipelineSettings {
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            rainy_day_threshold_mm: self.rainy_day_threshold_mm,
            ..AggregatorConfig::default()
        }
    }

    pub fn area_config(&self) -> AreaDetectionConfig {
        AreaDetectionConfig {
            max_area_sqm: self.area_ceiling_sqm,
            ..AreaDetectionConfig::default()
        }
    }

    pub fn suggestion_config(&self) -> SuggestionParserConfig {
        SuggestionParserConfig {
            max_suggestions: self.max_suggestions,
            ..SuggestionParserConfig::default()
        }
    }

    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            high_temperature_celsius: self.heat_alert_celsius,
            heavy_rain_mm: self.heavy_rain_alert_mm,
            ..AlertThresholds::default()
        }
    }

    pub fn yield_config(&self) -> YieldModelConfig {
        YieldModelConfig {
            default_area_sqm: self.default_area_sqm,
            ..YieldModelConfig::default()
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            area_ceiling_sqm: Decimal::from(100_000),
            default_area_sqm: Decimal::from(1000),
            max_suggestions: 3,
            top_alert_count: 2,
            rainy_day_threshold_mm: Decimal::new(5, 1),
            heat_alert_celsius: Decimal::from(35),
            heavy_rain_alert_mm: Decimal::from(50),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FIP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.units", "metric")?
            .set_default(
                "ai.api_endpoint",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("ai.api_key", "")?
            .set_default("ai.model", "gemini-1.5-flash")?
            .set_default("ai.timeout_secs", 30)?
            .set_default("pipeline.area_ceiling_sqm", "100000")?
            .set_default("pipeline.default_area_sqm", "1000")?
            .set_default("pipeline.max_suggestions", 3)?
            .set_default("pipeline.top_alert_count", 2)?
            .set_default("pipeline.rainy_day_threshold_mm", "0.5")?
            .set_default("pipeline.heat_alert_celsius", "35")?
            .set_default("pipeline.heavy_rain_alert_mm", "50")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FIP_ prefix)
            .add_source(
                Environment::with_prefix("FIP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
