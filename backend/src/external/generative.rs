//! Generative AI Client
//!
//! Client for a Gemini-style `generateContent` endpoint, used for both
//! text advisories and field image analysis.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::{AppError, AppResult};

/// Client for the generative text and vision service
#[derive(Clone)]
pub struct GenerativeClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    Image { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Response from the generate endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

impl GenerativeClient {
    /// Create a new generative AI client
    pub fn new(
        api_endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            api_key,
            model,
            http_client,
        })
    }

    /// Build from configuration; `None` when no API key is set
    pub fn from_config(config: &AiConfig) -> AppResult<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }

        Self::new(
            config.api_endpoint.clone(),
            config.api_key.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    /// Generate free-form text for a prompt
    pub async fn generate_text(&self, prompt: &str) -> AppResult<String> {
        self.generate(vec![RequestPart::Text {
            text: prompt.to_string(),
        }])
        .await
    }

    /// Ask the model about an image
    pub async fn analyze_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> AppResult<String> {
        self.generate(vec![
            RequestPart::Text {
                text: prompt.to_string(),
            },
            RequestPart::Image {
                inline_data: InlineData {
                    mime_type: mime_type.to_string(),
                    data: STANDARD.encode(image),
                },
            },
        ])
        .await
    }

    async fn generate(&self, parts: Vec<RequestPart>) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_endpoint, self.model);
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::AiServiceError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiServiceError(format!("Failed to parse response: {}", e)))?;

        result
            .into_text()
            .ok_or_else(|| AppError::AiServiceError("Response contained no text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_concatenated() {
        let body = r#"{"candidates": [
            {"content": {"parts": [{"text": "{\"detectedAreaSqm\": "}, {"text": "1200}"}]}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().as_deref(), Some("{\"detectedAreaSqm\": 1200}"));
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(response.into_text().is_none());

        let response: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_image_part_serialization() {
        let part = RequestPart::Image {
            inline_data: InlineData {
                mime_type: "image/png".to_string(),
                data: STANDARD.encode([1u8, 2, 3]),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inline_data"]["mime_type"], "image/png");
        assert_eq!(json["inline_data"]["data"], "AQID");
    }

    #[test]
    fn test_from_config_without_key() {
        let config = AiConfig {
            api_endpoint: "https://example.test".to_string(),
            api_key: String::new(),
            model: "m".to_string(),
            timeout_secs: 5,
        };
        assert!(GenerativeClient::from_config(&config).unwrap().is_none());
    }
}
