//! Domain request builders
//!
//! Each builder assembles its content and response schema, delegates to the
//! [`StructuredGenerationClient`](crate::ai::StructuredGenerationClient) and
//! returns a typed result. Failures are the client's classified message;
//! builders add no retries of their own.

pub mod scripts;
pub mod veo;
pub mod vision;

pub use scripts::{generate_scripts, SCENES_PER_SCRIPT, SCRIPT_COUNT};
pub use veo::generate_veo_prompts;
pub use vision::{analyze_image, analyze_image_in};

use crate::models::VisionAnalysis;

/// Vision data as embedded in prompts; `null` when no analysis was run.
fn vision_json(vision: Option<&VisionAnalysis>) -> String {
    serde_json::to_string(&vision).unwrap_or_else(|_| "null".to_string())
}
