//! Fashion AI generator - turns a product photo into marketing video scripts
//!
//! A Gemini-backed structured generation client with ordered model fallback,
//! plus request builders for vision analysis, script writing and Veo scene
//! prompts.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;
pub mod studio;

pub use error::{Error, Result};
