//! Ordered model fallback for structured JSON generation.
//!
//! Candidates are tried strictly in the order given. The first response that
//! parses and matches the schema wins. Retryable failures pause for a fixed
//! backoff and move on to the next candidate; fatal failures stop the loop.

use super::classify::{AttemptError, FailureCategory};
use super::request::{ContentPart, GenerationRequest};
use super::schema::Schema;
use super::StructuredBackend;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

/// Classified failure of a whole generation call.
///
/// `category` describes the last error only. Empty, non-JSON and
/// schema-mismatched replies always move on to the next candidate yet report
/// [`FailureCategory::Unknown`], so `category.is_retryable()` does not tell
/// whether the loop fell back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GenerationFailure {
    pub category: FailureCategory,
    pub message: String,
    pub attempted_models: Vec<String>,
}

impl GenerationFailure {
    fn from_last_error(last_error: &AttemptError, attempted_models: Vec<String>) -> Self {
        let category = last_error.category();
        let message = format!(
            "{} (models tried: {})",
            category.describe(),
            attempted_models.join(", ")
        );

        Self {
            category,
            message,
            attempted_models,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success { model: String, value: Value },
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success { .. })
    }

    pub fn into_result(self) -> std::result::Result<Value, GenerationFailure> {
        match self {
            GenerationOutcome::Success { value, .. } => Ok(value),
            GenerationOutcome::Failure(failure) => Err(failure),
        }
    }
}

/// What happened when one candidate was tried. Lives only for the duration
/// of a single `generate` call.
#[derive(Debug)]
struct AttemptRecord {
    model: String,
    error: AttemptError,
}

/// Fallback client over any [`StructuredBackend`].
///
/// Holds no per-call state, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct StructuredGenerationClient {
    backend: Arc<dyn StructuredBackend>,
    model_priority: Vec<String>,
    backoff: Duration,
}

impl StructuredGenerationClient {
    pub fn new(backend: Arc<dyn StructuredBackend>, model_priority: Vec<String>) -> Self {
        Self {
            backend,
            model_priority,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn model_priority(&self) -> &[String] {
        &self.model_priority
    }

    /// Build a request that uses the configured model priority.
    pub fn request(
        &self,
        label: &str,
        content: Vec<ContentPart>,
        response_schema: Schema,
    ) -> Result<GenerationRequest> {
        GenerationRequest::new(label, self.model_priority.clone(), content, response_schema)
    }

    /// Run the fallback loop. Upstream failures never escape as errors; they
    /// are folded into [`GenerationOutcome::Failure`].
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        let span = tracing::info_span!(
            "generate",
            label = request.label(),
            generation_id = %Uuid::new_v4()
        );
        self.generate_inner(request).instrument(span).await
    }

    async fn generate_inner(&self, request: &GenerationRequest) -> GenerationOutcome {
        let label = request.label();
        let candidates = request.candidate_models();
        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(candidates.len());

        for (index, model) in candidates.iter().enumerate() {
            info!("[{}] Trying model {}", label, model);

            let error = match self.attempt(model, request).await {
                Ok(value) => {
                    info!("[{}] Succeeded with model {}", label, model);
                    return GenerationOutcome::Success {
                        model: model.clone(),
                        value,
                    };
                }
                Err(error) => error,
            };

            let retryable = error.is_retryable();
            let has_next = index + 1 < candidates.len();
            if retryable {
                warn!(
                    "[{}] Model {} failed ({}){}",
                    label,
                    model,
                    error,
                    if has_next { ", switching model" } else { "" }
                );
            } else {
                error!(
                    "[{}] Fatal error from model {}, not trying further models: {}",
                    label, model, error
                );
            }

            attempts.push(AttemptRecord {
                model: model.clone(),
                error,
            });

            if !retryable {
                break;
            }
            if has_next && !self.backoff.is_zero() {
                tokio::time::sleep(self.backoff).await;
            }
        }

        let failure = match attempts.last() {
            Some(last) => GenerationFailure::from_last_error(
                &last.error,
                attempts.iter().map(|a| a.model.clone()).collect(),
            ),
            // GenerationRequest guarantees at least one candidate.
            None => GenerationFailure {
                category: FailureCategory::Unknown,
                message: FailureCategory::Unknown.describe().to_string(),
                attempted_models: Vec::new(),
            },
        };

        error!(
            "[{}] Generation failed ({}) after models: {}",
            label,
            failure.category,
            failure.attempted_models.join(", ")
        );
        GenerationOutcome::Failure(failure)
    }

    async fn attempt(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> std::result::Result<Value, AttemptError> {
        let text = self
            .backend
            .generate_json(model, request)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or(AttemptError::EmptyResponse)?;

        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| AttemptError::InvalidJson(e.to_string()))?;

        request
            .response_schema()
            .check(&value)
            .map_err(AttemptError::SchemaMismatch)?;

        Ok(value)
    }

    /// Generate and deserialize into `T`, surfacing the classified failure
    /// as [`Error::Generation`].
    pub async fn generate_typed<T: DeserializeOwned>(
        &self,
        request: &GenerationRequest,
    ) -> Result<T> {
        let value = self.generate(request).await.into_result()?;
        serde_json::from_value(value).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(backend: &MockBackend, models: &[&str]) -> StructuredGenerationClient {
        StructuredGenerationClient::new(
            Arc::new(backend.clone()),
            models.iter().map(|m| m.to_string()).collect(),
        )
        .with_backoff(Duration::ZERO)
    }

    fn category_request(client: &StructuredGenerationClient) -> GenerationRequest {
        client
            .request(
                "Vision Analysis",
                vec![ContentPart::text("describe")],
                Schema::object([("category", Schema::string())]),
            )
            .unwrap()
    }

    fn status(code: u16, body: &str) -> AttemptError {
        AttemptError::Status {
            status: code,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_falls_back_after_overload() {
        let backend = MockBackend::new()
            .with_error("m1", status(503, "Overloaded"))
            .with_json("m2", &json!({ "category": "dress" }));
        let client = client(&backend, &["m1", "m2"]);

        let outcome = client.generate(&category_request(&client)).await;

        assert_eq!(
            outcome,
            GenerationOutcome::Success {
                model: "m2".to_string(),
                value: json!({ "category": "dress" })
            }
        );
        assert_eq!(backend.calls(), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let backend = MockBackend::new()
            .with_error("a", status(404, "model not found"))
            .with_json("b", &json!({ "category": "shoes" }))
            .with_json("c", &json!({ "category": "never" }));
        let client = client(&backend, &["a", "b", "c"]);

        let value = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap();

        assert_eq!(value, json!({ "category": "shoes" }));
        assert_eq!(backend.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_auth_error_stops_immediately() {
        let backend = MockBackend::new()
            .with_error("m1", status(401, "API_KEY_INVALID"))
            .with_json("m2", &json!({ "category": "dress" }));
        let client = client(&backend, &["m1", "m2", "m3"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::Authentication);
        assert_eq!(failure.attempted_models, vec!["m1"]);
        assert_eq!(backend.calls(), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_safety_block_stops_immediately() {
        let backend = MockBackend::new()
            .with_error("m1", AttemptError::Blocked("SAFETY".to_string()))
            .with_json("m2", &json!({ "category": "dress" }));
        let client = client(&backend, &["m1", "m2"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::SafetyBlock);
        assert_eq!(backend.calls(), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_unknown_error_is_fatal() {
        let backend = MockBackend::new()
            .with_error("m1", status(400, "INVALID_ARGUMENT: malformed request"))
            .with_json("m2", &json!({ "category": "dress" }));
        let client = client(&backend, &["m1", "m2"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::Unknown);
        assert_eq!(backend.calls(), vec!["m1"]);
    }

    #[tokio::test]
    async fn test_all_not_found_lists_every_model_in_order() {
        let backend = MockBackend::new()
            .with_error("m1", status(404, "not found"))
            .with_error("m2", status(404, "not found"));
        let client = client(&backend, &["m1", "m2"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::ModelNotFound);
        assert_eq!(failure.attempted_models, vec!["m1", "m2"]);
        assert!(failure.message.ends_with("(models tried: m1, m2)"));
        assert!(failure
            .message
            .starts_with(FailureCategory::ModelNotFound.describe()));
    }

    #[tokio::test]
    async fn test_all_overloaded_reports_last_category() {
        let backend = MockBackend::new()
            .with_error("a", status(429, "RESOURCE_EXHAUSTED"))
            .with_error("b", status(503, "Overloaded"))
            .with_error("c", status(503, "Overloaded"));
        let client = client(&backend, &["a", "b", "c"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::ServiceOverloaded);
        assert!(failure.category.is_retryable());
        assert_eq!(failure.attempted_models, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let backend = MockBackend::new()
            .with_empty("m1")
            .with_reply("m2", Ok(Some("   ".to_string())))
            .with_json("m3", &json!({ "category": "hat" }));
        let client = client(&backend, &["m1", "m2", "m3"]);

        let outcome = client.generate(&category_request(&client)).await;

        assert!(outcome.is_success());
        assert_eq!(backend.calls(), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        let backend = MockBackend::new()
            .with_reply("m1", Ok(Some("{\"category\": ".to_string())))
            .with_json("m2", &json!({ "category": "scarf" }));
        let client = client(&backend, &["m1", "m2"]);

        let value = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap();

        assert_eq!(value["category"], "scarf");
    }

    #[tokio::test]
    async fn test_truncated_long_reply_is_unknown_not_auth() {
        let truncated = format!("{{\"category\": \"{}", "x".repeat(4003));
        let backend = MockBackend::new()
            .with_reply("m1", Ok(Some(truncated.clone())))
            .with_reply("m2", Ok(Some(truncated)));
        let client = client(&backend, &["m1", "m2"]);

        let failure = client
            .generate(&category_request(&client))
            .await
            .into_result()
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::Unknown);
        assert_eq!(failure.attempted_models, vec!["m1", "m2"]);
        assert!(failure.message.starts_with(FailureCategory::Unknown.describe()));
    }

    #[tokio::test]
    async fn test_out_of_range_integer_falls_back() {
        let schema = Schema::object([("value", Schema::integer())]);
        let backend = MockBackend::new()
            .with_reply("m1", Ok(Some(r#"{"value": 10000000000000000000}"#.to_string())))
            .with_json("m2", &json!({ "value": 88 }));
        let client = client(&backend, &["m1", "m2"]);
        let request = client
            .request("Scores", vec![ContentPart::text("score")], schema)
            .unwrap();

        let value = client.generate(&request).await.into_result().unwrap();

        assert_eq!(value, json!({ "value": 88 }));
        assert_eq!(backend.calls(), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_not_success() {
        let backend = MockBackend::new().with_json("m1", &json!({ "colour": "red" }));
        let client = client(&backend, &["m1"]);

        let outcome = client.generate(&category_request(&client)).await;

        let GenerationOutcome::Failure(failure) = outcome else {
            panic!("schema mismatch must not be a success");
        };
        assert_eq!(failure.category, FailureCategory::Unknown);
        assert!(!failure.category.is_retryable());
        assert_eq!(failure.attempted_models, vec!["m1"]);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_value() {
        let original = json!({
            "category": "jacket",
            "tags": ["warm", "waterproof"],
            "scores": [{ "name": "luxury", "value": 72 }]
        });
        let schema = Schema::object([
            ("category", Schema::string()),
            ("tags", Schema::strings()),
            (
                "scores",
                Schema::array(Schema::object([
                    ("name", Schema::string()),
                    ("value", Schema::integer()),
                ])),
            ),
        ]);
        let backend = MockBackend::new().with_json("m1", &original);
        let client = client(&backend, &["m1"]);
        let request = client
            .request("round trip", vec![ContentPart::text("x")], schema)
            .unwrap();

        let value = client.generate(&request).await.into_result().unwrap();
        assert_eq!(value, original);
    }

    #[tokio::test]
    async fn test_request_models_override_priority() {
        let backend = MockBackend::new().with_json("custom", &json!({ "category": "bag" }));
        let client = client(&backend, &["default"]);
        let request = GenerationRequest::new(
            "custom",
            vec!["custom".to_string()],
            vec![ContentPart::text("x")],
            Schema::object([("category", Schema::string())]),
        )
        .unwrap();

        assert!(client.generate(&request).await.is_success());
        assert_eq!(backend.calls(), vec!["custom"]);
    }

    #[tokio::test]
    async fn test_generate_typed_surfaces_failure_message() {
        let backend = MockBackend::new().with_error("m1", status(401, "API_KEY_INVALID"));
        let client = client(&backend, &["m1"]);

        #[derive(Debug, serde::Deserialize)]
        struct Category {
            #[allow(dead_code)]
            category: String,
        }

        let err = client
            .generate_typed::<Category>(&category_request(&client))
            .await
            .unwrap_err();

        assert!(matches!(&err, Error::Generation(f) if f.category == FailureCategory::Authentication));
        assert_eq!(
            err.to_string(),
            format!(
                "{} (models tried: m1)",
                FailureCategory::Authentication.describe()
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_between_candidates_only() {
        let backend = MockBackend::new()
            .with_error("m1", status(503, "Overloaded"))
            .with_error("m2", status(503, "Overloaded"));
        let client = StructuredGenerationClient::new(
            Arc::new(backend.clone()),
            vec!["m1".to_string(), "m2".to_string()],
        );

        let started = tokio::time::Instant::now();
        let outcome = client.generate(&category_request(&client)).await;

        // One pause between m1 and m2, none after the last candidate.
        let elapsed = started.elapsed();
        assert!(!outcome.is_success());
        assert!(elapsed >= DEFAULT_BACKOFF && elapsed < DEFAULT_BACKOFF * 2);
    }
}
