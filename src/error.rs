//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use crate::ai::GenerationFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    /// Classified failure of a structured generation call. Displays only the
    /// user-facing message.
    #[error("{0}")]
    Generation(#[from] GenerationFailure),
}

pub type Result<T> = std::result::Result<T, Error>;
