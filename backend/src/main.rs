//! Farm Intelligence Pipeline - Backend Server
//!
//! Turns forecasts, field photos and crop records into weather summaries,
//! crop suggestions, field areas, yield predictions and ranked alerts.

use axum::{routing::get, Router};
use shared::models::WeatherSummary;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{GenerativeClient, WeatherClient};
use services::{AdvisoryService, AlertService, AreaDetectionService, WeatherService, YieldService};

/// Log filter used when `RUST_LOG` is unset; `shared` carries the pipeline stage logs
const DEFAULT_LOG_FILTER: &str = "fip_server=debug,shared=debug,tower_http=debug";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather_client: Option<WeatherClient>,
    pub ai_client: Option<GenerativeClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let weather_client = WeatherClient::from_config(&config.weather);
        let ai_client = GenerativeClient::from_config(&config.ai)?;

        Ok(Self {
            config: Arc::new(config),
            weather_client,
            ai_client,
        })
    }

    pub fn weather_service(&self) -> WeatherService {
        WeatherService::new(self.weather_client.clone(), self.config.pipeline.aggregator_config())
    }

    pub fn advisory_service(&self) -> AdvisoryService {
        AdvisoryService::new(self.ai_client.clone(), self.config.pipeline.suggestion_config())
    }

    pub fn area_service(&self) -> AreaDetectionService {
        AreaDetectionService::new(self.ai_client.clone(), self.config.pipeline.area_config())
    }

    pub fn yield_service(&self) -> YieldService {
        YieldService::new(self.config.pipeline.yield_config())
    }

    pub fn alert_service(&self) -> AlertService {
        AlertService::new(
            self.config.pipeline.alert_thresholds(),
            self.config.pipeline.top_alert_count,
        )
    }

    /// Summary with no forecast behind it, for places the provider cannot resolve
    pub fn empty_summary(&self, label: &str) -> WeatherSummary {
        shared::pipeline::WeatherAggregator::new(self.config.pipeline.aggregator_config())
            .aggregate(label, &[])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Farm Intelligence Pipeline Server");
    tracing::info!("Environment: {}", config.environment);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::new(config)?;
    if state.weather_client.is_none() {
        tracing::warn!("Weather API key not set; summaries will report no data");
    }
    if state.ai_client.is_none() {
        tracing::warn!("Generative API key not set; suggestions and area detection use fallbacks");
    }

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farm Intelligence Pipeline API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
