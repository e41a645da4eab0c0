//! Field area detection service: image to validated area measurement

use rust_decimal::Decimal;
use shared::models::AreaDetectionResult;
use shared::pipeline::{AreaDetectionConfig, AreaDetectionParser};

use crate::external::GenerativeClient;
use crate::services::prompts;

#[derive(Clone)]
pub struct AreaDetectionService {
    ai_client: Option<GenerativeClient>,
    parser: AreaDetectionParser,
}

impl AreaDetectionService {
    pub fn new(ai_client: Option<GenerativeClient>, config: AreaDetectionConfig) -> Self {
        Self {
            ai_client,
            parser: AreaDetectionParser::new(config),
        }
    }

    /// Measure a field from an image; without a vision reply the hint fallback applies
    pub async fn detect(
        &self,
        image: &[u8],
        mime_type: &str,
        area_hint_sqm: Option<Decimal>,
    ) -> AreaDetectionResult {
        let reply = match self.ai_client.as_ref() {
            Some(client) => {
                let prompt = prompts::area_prompt(area_hint_sqm);
                match client.analyze_image(&prompt, image, mime_type).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Area detection request failed");
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        self.parser.detect(&reply, area_hint_sqm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_ai_uses_hint() {
        let service = AreaDetectionService::new(None, AreaDetectionConfig::default());

        let result = service.detect(&[0xff, 0xd8], "image/jpeg", Some(Decimal::from(2500))).await;

        assert_eq!(result.detected_area_sqm, Decimal::from(2000));
        assert_eq!(result.confidence, Decimal::new(2, 1));
    }

    #[tokio::test]
    async fn test_without_ai_or_hint() {
        let service = AreaDetectionService::new(None, AreaDetectionConfig::default());
        let result = service.detect(&[], "image/png", None).await;

        assert_eq!(result.detected_area_sqm, Decimal::ZERO);
        // under 10 sqm caps confidence at 0.3
        assert_eq!(result.confidence, Decimal::new(3, 1));
        assert!(result.description.contains("verify"));
    }
}
