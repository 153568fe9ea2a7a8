//! Structured generation against a remote model service
//!
//! Provides the fallback client that turns a [`GenerationRequest`] into
//! schema-checked JSON, the failure classification it relies on, and the
//! Gemini REST binding used in production.

pub mod classify;
pub mod fallback;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod request;
pub mod schema;

pub use classify::{classify_signal, AttemptError, FailureCategory};
pub use fallback::{GenerationFailure, GenerationOutcome, StructuredGenerationClient};
pub use gemini::GeminiBackend;
pub use mime::InlineImage;
pub use mock::MockBackend;
pub use request::{ContentPart, GenerationRequest};
pub use schema::{Schema, SchemaType};

use async_trait::async_trait;

/// One JSON-mode call against one model.
///
/// `Ok(None)` means the service answered without any content.
#[async_trait]
pub trait StructuredBackend: Send + Sync {
    async fn generate_json(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, AttemptError>;
}
