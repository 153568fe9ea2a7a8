use crate::ai::{ContentPart, InlineImage, Schema, StructuredGenerationClient};
use crate::models::{Language, VisionAnalysis};
use crate::{prompts, Result};

pub const LABEL: &str = "Vision Analysis";

pub fn schema() -> Schema {
    Schema::object([
        ("category", Schema::string()),
        ("color_tone", Schema::string()),
        ("style", Schema::string()),
        ("target_age", Schema::string()),
        ("brand_tone", Schema::string()),
        ("usp_highlights", Schema::strings()),
        (
            "tone_scores",
            Schema::array(Schema::object([
                ("name", Schema::string()),
                ("value", Schema::integer().with_description("Score from 0 to 100")),
            ])),
        ),
    ])
}

/// Describe a product photo, answering in the default language.
pub async fn analyze_image(
    client: &StructuredGenerationClient,
    image: &InlineImage,
) -> Result<VisionAnalysis> {
    analyze_image_in(client, image, Language::default()).await
}

pub async fn analyze_image_in(
    client: &StructuredGenerationClient,
    image: &InlineImage,
    language: Language,
) -> Result<VisionAnalysis> {
    tracing::debug!(
        "Analysing {} image ({} base64 chars)",
        image.mime_type,
        image.data.len()
    );

    let instructions = prompts::render(
        prompts::VISION_ANALYSIS,
        &[("language", &language.to_string())],
    );
    let request = client.request(
        LABEL,
        vec![ContentPart::from(image.clone()), ContentPart::text(instructions)],
        schema(),
    )?;

    client.generate_typed(&request).await
}
