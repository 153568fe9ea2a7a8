use super::mime::InlineImage;
use super::schema::Schema;
use crate::{Error, Result};

/// One segment of the multi-part input sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Base64 payload with its MIME type.
    Inline { mime_type: String, data: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(text) => Some(text),
            ContentPart::Inline { .. } => None,
        }
    }
}

impl From<InlineImage> for ContentPart {
    fn from(image: InlineImage) -> Self {
        ContentPart::Inline {
            mime_type: image.mime_type,
            data: image.data,
        }
    }
}

/// Everything needed for one structured generation call.
///
/// Immutable once built; `candidate_models` is never empty.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    candidate_models: Vec<String>,
    content: Vec<ContentPart>,
    response_schema: Schema,
    label: String,
}

impl GenerationRequest {
    pub fn new(
        label: impl Into<String>,
        candidate_models: Vec<String>,
        content: Vec<ContentPart>,
        response_schema: Schema,
    ) -> Result<Self> {
        let label = label.into();
        if candidate_models.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "{}: at least one candidate model is required",
                label
            )));
        }

        Ok(Self {
            candidate_models,
            content,
            response_schema,
            label,
        })
    }

    pub fn candidate_models(&self) -> &[String] {
        &self.candidate_models
    }

    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    pub fn response_schema(&self) -> &Schema {
        &self.response_schema
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Concatenated text segments, handy for logging and tests.
    pub fn prompt_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
