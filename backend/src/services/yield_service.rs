//! Yield prediction service with concurrent batch evaluation

use std::sync::Arc;

use chrono::Utc;
use shared::models::{CropEntity, WeatherSummary, YieldPrediction};
use shared::pipeline::{YieldModel, YieldModelConfig};

use crate::error::AppResult;

#[derive(Clone)]
pub struct YieldService {
    model: Arc<YieldModel>,
}

impl YieldService {
    pub fn new(config: YieldModelConfig) -> Self {
        Self {
            model: Arc::new(YieldModel::new(config)),
        }
    }

    /// Predict a single crop
    pub fn predict(
        &self,
        crop: &CropEntity,
        weather: Option<&WeatherSummary>,
    ) -> AppResult<YieldPrediction> {
        Ok(self.model.predict(crop, weather)?)
    }

    /// Predict every crop on its own task.
    ///
    /// Results come back in input order; crops whose task failed, panicked or
    /// was cancelled are logged and left out.
    pub async fn predict_many(
        &self,
        crops: Vec<CropEntity>,
        weather: Option<WeatherSummary>,
    ) -> Vec<YieldPrediction> {
        let weather = Arc::new(weather);
        let computed_at = Utc::now();

        let handles: Vec<_> = crops
            .into_iter()
            .map(|crop| {
                let model = Arc::clone(&self.model);
                let weather = Arc::clone(&weather);
                let crop_id = crop.id;
                let handle = tokio::spawn(async move {
                    model.predict_at(&crop, (*weather).as_ref(), computed_at)
                });
                (crop_id, handle)
            })
            .collect();

        let mut predictions = Vec::with_capacity(handles.len());
        for (crop_id, handle) in handles {
            match handle.await {
                Ok(Ok(prediction)) => predictions.push(prediction),
                Ok(Err(e)) => {
                    tracing::warn!(
                        crop_id = %crop_id,
                        error = %e,
                        "Yield prediction failed, skipping crop"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        crop_id = %crop_id,
                        error = %e,
                        "Yield prediction task did not complete"
                    );
                }
            }
        }

        predictions
    }
}
