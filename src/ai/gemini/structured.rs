use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentResponse, Part, StructuredGenerationConfig, StructuredRequest,
};
use crate::ai::{AttemptError, GenerationRequest, StructuredBackend};
use async_trait::async_trait;
use std::time::Duration;

const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

/// JSON-mode `generateContent` backend for the fallback client.
pub struct GeminiBackend {
    http: GeminiHttpClient,
}

impl GeminiBackend {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn extract_text(response: &GenerateContentResponse) -> Result<Option<String>, AttemptError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AttemptError::Blocked(format!("prompt blocked ({})", reason)));
        }

        let Some(candidate) = response.candidates.first() else {
            return Ok(None);
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            if let Some(reason) = candidate
                .finish_reason
                .as_deref()
                .filter(|r| BLOCKING_FINISH_REASONS.contains(r))
            {
                return Err(AttemptError::Blocked(format!(
                    "finish reason {}",
                    reason
                )));
            }
            return Ok(None);
        }

        Ok(Some(text))
    }
}

#[async_trait]
impl StructuredBackend for GeminiBackend {
    async fn generate_json(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, AttemptError> {
        let body = StructuredRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: request.content().iter().map(Part::from).collect(),
            }],
            generation_config: StructuredGenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.response_schema(),
            },
        };

        let response = self.http.generate_content(model, &body).await?;
        Self::extract_text(&response)
    }
}
