//! Classification of upstream failures into the six user-facing categories.
//!
//! Upstream error payloads are matched by signal substrings (or status codes
//! when available). All matching lives here so it can be swapped when the
//! service changes its error format.

use std::fmt;
use thiserror::Error;

/// Why a single attempt against one candidate model failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("empty response (no content)")]
    EmptyResponse,

    #[error("response blocked: {0}")]
    Blocked(String),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response does not match the schema: {0}")]
    SchemaMismatch(String),
}

impl AttemptError {
    pub fn category(&self) -> FailureCategory {
        match self {
            AttemptError::Blocked(_) => FailureCategory::SafetyBlock,
            AttemptError::Status { status, body } => {
                FailureCategory::from_status(*status).unwrap_or_else(|| classify_signal(body))
            }
            // Local diagnostics carry line numbers and URLs, which must not be
            // read as upstream signals.
            AttemptError::Transport(_)
            | AttemptError::EmptyResponse
            | AttemptError::InvalidJson(_)
            | AttemptError::SchemaMismatch(_) => FailureCategory::Unknown,
        }
    }

    /// Whether a different candidate model might succeed where this one failed.
    ///
    /// Malformed or empty output is model-specific, so it always falls through
    /// to the next candidate. Everything else follows its category.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::EmptyResponse
            | AttemptError::InvalidJson(_)
            | AttemptError::SchemaMismatch(_) => true,
            AttemptError::Blocked(_) => false,
            AttemptError::Status { .. } | AttemptError::Transport(_) => {
                self.category().is_retryable()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    Quota,
    Authentication,
    ServiceOverloaded,
    SafetyBlock,
    ModelNotFound,
    Unknown,
}

impl FailureCategory {
    fn from_status(status: u16) -> Option<Self> {
        match status {
            429 => Some(FailureCategory::Quota),
            401 => Some(FailureCategory::Authentication),
            503 => Some(FailureCategory::ServiceOverloaded),
            404 => Some(FailureCategory::ModelNotFound),
            _ => None,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureCategory::Quota
                | FailureCategory::ServiceOverloaded
                | FailureCategory::ModelNotFound
        )
    }

    /// Stable machine-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureCategory::Quota => "quota",
            FailureCategory::Authentication => "authentication",
            FailureCategory::ServiceOverloaded => "service-overloaded",
            FailureCategory::SafetyBlock => "safety-block",
            FailureCategory::ModelNotFound => "model-not-found",
            FailureCategory::Unknown => "unknown",
        }
    }

    /// Friendly text shown to the end user.
    pub fn describe(self) -> &'static str {
        match self {
            FailureCategory::Quota => {
                "Usage quota exhausted or the service is rate limiting requests. Please try again later."
            }
            FailureCategory::Authentication => "Authentication failed: the API key is invalid.",
            FailureCategory::ServiceOverloaded => "The AI service is temporarily overloaded.",
            FailureCategory::SafetyBlock => "The content was blocked by the safety filter.",
            FailureCategory::ModelNotFound => "The requested AI model does not exist or is unavailable.",
            FailureCategory::Unknown => "An unknown error occurred while processing the request.",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const QUOTA_SIGNALS: &[&str] = &["429", "quota exceeded", "resource_exhausted", "rate limit"];
const AUTH_SIGNALS: &[&str] = &[
    "401",
    "api_key_invalid",
    "unauthenticated",
    "api key not valid",
];
const OVERLOADED_SIGNALS: &[&str] = &["503", "overloaded", "unavailable"];
const SAFETY_SIGNALS: &[&str] = &["safety", "blocked"];
const NOT_FOUND_SIGNALS: &[&str] = &["404", "not found"];

/// Map stringified upstream error text to a category. First match wins, in
/// the order quota, auth, overloaded, safety, not-found.
pub fn classify_signal(text: &str) -> FailureCategory {
    let text = text.to_lowercase();
    let table: [(&[&str], FailureCategory); 5] = [
        (QUOTA_SIGNALS, FailureCategory::Quota),
        (AUTH_SIGNALS, FailureCategory::Authentication),
        (OVERLOADED_SIGNALS, FailureCategory::ServiceOverloaded),
        (SAFETY_SIGNALS, FailureCategory::SafetyBlock),
        (NOT_FOUND_SIGNALS, FailureCategory::ModelNotFound),
    ];

    table
        .iter()
        .find(|(signals, _)| signals.iter().any(|s| text.contains(s)))
        .map(|(_, category)| *category)
        .unwrap_or(FailureCategory::Unknown)
}
