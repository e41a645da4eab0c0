//! Alert service: ranked alerts plus the dashboard's top picks

use serde::Serialize;
use shared::models::{Alert, CropSuggestionsResponse, WeatherSummary};
use shared::pipeline::{top_alerts, AlertEngine, AlertThresholds};

/// Ranked alerts with the actionable subset shown first on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub top: Vec<Alert>,
}

#[derive(Clone)]
pub struct AlertService {
    engine: AlertEngine,
    top_count: usize,
}

impl AlertService {
    pub fn new(thresholds: AlertThresholds, top_count: usize) -> Self {
        Self {
            engine: AlertEngine::new(thresholds),
            top_count,
        }
    }

    pub fn report(
        &self,
        weather: Option<&WeatherSummary>,
        suggestions: Option<&CropSuggestionsResponse>,
    ) -> AlertReport {
        let alerts = self.engine.derive_alerts(weather, suggestions);
        let top = top_alerts(&alerts, self.top_count);

        tracing::debug!(total = alerts.len(), top = top.len(), "Alerts derived");

        AlertReport { alerts, top }
    }
}
