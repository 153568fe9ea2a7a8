use super::types::GenerateContentResponse;
use crate::ai::AttemptError;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client. The model is chosen per call so one
/// instance serves every candidate in a fallback chain.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, timeout, Client::new())
    }

    pub fn new_with_client(api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Calls Gemini's `generateContent` endpoint.
    ///
    /// `model` may be a bare model ID (`gemini-2.5-flash`) or carry the
    /// `models/` prefix.
    pub async fn generate_content<Req: Serialize>(
        &self,
        model: &str,
        request: &Req,
    ) -> Result<GenerateContentResponse, AttemptError> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                AttemptError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("Gemini API error (status {}): {}", status, body);
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            AttemptError::InvalidJson(format!("Gemini response envelope: {}", e))
        })
    }
}
