use super::vision_json;
use crate::ai::{ContentPart, Schema, StructuredGenerationClient};
use crate::models::{GeneratedVeoData, Script, ScriptConfig};
use crate::{prompts, Result};

pub const LABEL: &str = "Veo Prompts";

pub fn scene_prompt_schema() -> Schema {
    let appearance = Schema::object([
        ("hair", Schema::string()),
        ("expression", Schema::string()),
        ("outfit", Schema::string()),
    ]);
    let character = Schema::object([
        ("name", Schema::string()),
        ("age", Schema::string()),
        ("gender", Schema::string()),
        ("ethnicity", Schema::string()),
        ("appearance", appearance),
    ]);

    Schema::object([
        ("description", Schema::string()),
        ("style", Schema::string()),
        ("camera", Schema::string()),
        ("lighting", Schema::string()),
        ("environment", Schema::string()),
        ("characters", Schema::array(character)),
        ("motion", Schema::string()),
        ("dialogue", Schema::strings()),
        ("ending", Schema::string()),
        ("text", Schema::string()),
        ("keywords", Schema::strings()),
        ("aspect_ratio", Schema::string().with_description("For example 9:16")),
    ])
}

pub fn schema() -> Schema {
    Schema::object([
        ("scenePrompts", Schema::array(scene_prompt_schema())),
        ("adsCaption", Schema::string()),
        ("hashtags", Schema::strings()),
        ("ctaVariations", Schema::strings()),
    ])
}

pub(crate) fn build_prompt(script: &Script, config: &ScriptConfig) -> String {
    let scenes = serde_json::to_string(&script.scenes).unwrap_or_else(|_| "[]".to_string());

    prompts::render(
        prompts::VEO_PROMPTS,
        &[
            ("scene_count", &script.scenes.len().to_string()),
            ("title", &script.title),
            ("scenes", &scenes),
            ("vision", &vision_json(config.vision.as_ref())),
        ],
    )
}

/// Turn one script into Veo scene prompts plus ad copy.
///
/// One prompt per scene in scene order is requested of the model but not
/// enforced here; a count mismatch is only logged.
pub async fn generate_veo_prompts(
    client: &StructuredGenerationClient,
    script: &Script,
    config: &ScriptConfig,
) -> Result<GeneratedVeoData> {
    let request = client.request(
        LABEL,
        vec![ContentPart::text(build_prompt(script, config))],
        schema(),
    )?;
    let data: GeneratedVeoData = client.generate_typed(&request).await?;

    if data.scene_prompts.len() != script.scenes.len() {
        tracing::warn!(
            "[{}] Script '{}' has {} scenes but {} scene prompts came back",
            LABEL,
            script.title,
            script.scenes.len(),
            data.scene_prompts.len()
        );
    }

    Ok(data)
}
