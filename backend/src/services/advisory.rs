//! Crop advisory service: weather summary to crop suggestions

use shared::models::{CropSuggestionsResponse, WeatherSummary};
use shared::pipeline::{SuggestionParser, SuggestionParserConfig};

use crate::external::GenerativeClient;
use crate::services::prompts;

#[derive(Clone)]
pub struct AdvisoryService {
    ai_client: Option<GenerativeClient>,
    parser: SuggestionParser,
}

impl AdvisoryService {
    pub fn new(ai_client: Option<GenerativeClient>, config: SuggestionParserConfig) -> Self {
        Self {
            ai_client,
            parser: SuggestionParser::new(config),
        }
    }

    /// Ask the text service for suggestions; keyword and rule tiers cover any failure
    pub async fn suggest(&self, summary: &WeatherSummary) -> CropSuggestionsResponse {
        let reply = match self.ai_client.as_ref() {
            Some(client) => {
                let prompt =
                    prompts::suggestion_prompt(summary, self.parser.config().max_suggestions);
                match client.generate_text(&prompt).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(
                            location = %summary.location,
                            error = %e,
                            "Suggestion request failed"
                        );
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        let response = self.parser.parse(&reply, summary);
        tracing::debug!(
            location = %summary.location,
            source = ?response.source,
            count = response.suggestions.len(),
            "Crop suggestions ready"
        );
        response
    }
}
