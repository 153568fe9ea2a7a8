use super::vision_json;
use crate::ai::{ContentPart, Schema, StructuredGenerationClient};
use crate::models::{Script, ScriptConfig};
use crate::{prompts, Result};

pub const LABEL: &str = "Generate Scripts";

/// Scripts requested per call. Asked of the model, not checked locally.
pub const SCRIPT_COUNT: usize = 5;
pub const SCENES_PER_SCRIPT: usize = 3;

pub fn scene_schema() -> Schema {
    Schema::object([
        ("time", Schema::string()),
        ("action", Schema::string()),
        ("dialogue_or_text", Schema::string()),
        ("camera_angle", Schema::string()),
        ("visual_prompt", Schema::string()),
        ("music", Schema::string()),
    ])
}

pub fn schema() -> Schema {
    Schema::array(Schema::object([
        ("id", Schema::string()),
        ("title", Schema::string()),
        ("hook", Schema::string()),
        ("rationale", Schema::string()),
        ("benefits_highlighted", Schema::strings()),
        ("cta_overlay", Schema::string()),
        ("cta_voice", Schema::string()),
        ("scenes", Schema::array(scene_schema())),
    ]))
}

pub(crate) fn build_prompt(config: &ScriptConfig) -> String {
    let dialogue_requirement = if config.video_style.is_no_dialogue() {
        prompts::DIALOGUE_NONE.trim().to_string()
    } else {
        prompts::render(
            prompts::DIALOGUE_SPOKEN.trim(),
            &[("accent", &config.accent.to_string())],
        )
    };

    prompts::render(
        prompts::SCRIPTS,
        &[
            ("script_count", &SCRIPT_COUNT.to_string()),
            ("scene_count", &SCENES_PER_SCRIPT.to_string()),
            ("product_name", &config.product_name),
            ("product_description", &config.product_description),
            ("vision", &vision_json(config.vision.as_ref())),
            ("style", &config.video_style.to_string()),
            ("video_type", &config.video_type.to_string()),
            ("language", &config.language.to_string()),
            ("dialogue_requirement", &dialogue_requirement),
        ],
    )
}

pub async fn generate_scripts(
    client: &StructuredGenerationClient,
    config: &ScriptConfig,
) -> Result<Vec<Script>> {
    let request = client.request(LABEL, vec![ContentPart::text(build_prompt(config))], schema())?;
    let scripts: Vec<Script> = client.generate_typed(&request).await?;

    if scripts.len() != SCRIPT_COUNT {
        tracing::warn!(
            "[{}] Expected {} scripts, model returned {}",
            LABEL,
            SCRIPT_COUNT,
            scripts.len()
        );
    }
    for script in scripts
        .iter()
        .filter(|s| s.scenes.len() != SCENES_PER_SCRIPT)
    {
        tracing::warn!(
            "[{}] Script '{}' has {} scenes, expected {}",
            LABEL,
            script.title,
            script.scenes.len(),
            SCENES_PER_SCRIPT
        );
    }

    Ok(scripts)
}
