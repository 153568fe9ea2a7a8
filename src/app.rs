//! Application orchestration from product photo to Veo prompts.

use crate::ai::{GeminiBackend, InlineImage, StructuredGenerationClient};
use crate::models::{Config, GeneratedVeoData, Script, ScriptConfig, VisionAnalysis};
use crate::studio;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Everything produced for one product photo.
#[derive(Debug, Clone, Serialize)]
pub struct Storyboard {
    pub vision: VisionAnalysis,
    pub product_description: String,
    pub scripts: Vec<Script>,
    pub selected_script: usize,
    pub veo: GeneratedVeoData,
}

/// Runs analysis, script writing and Veo prompt generation in sequence.
pub struct App {
    client: StructuredGenerationClient,
}

impl App {
    /// Build an app around an existing client. Tests and harnesses use this
    /// to inject a mock backend.
    pub fn with_client(client: StructuredGenerationClient) -> Self {
        Self { client }
    }

    /// Construct an app from configuration, sharing one HTTP connection pool
    /// across every call.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;
        let backend = GeminiBackend::new_with_client(
            config.gemini_api_key.clone(),
            config.request_timeout,
            http_client,
        )
        .with_base_url(config.gemini_base_url.clone());

        info!("Model priority: {}", config.models.join(" > "));

        let client = StructuredGenerationClient::new(Arc::new(backend), config.models.clone())
            .with_backoff(config.fallback_backoff);
        Ok(Self::with_client(client))
    }

    pub fn client(&self) -> &StructuredGenerationClient {
        &self.client
    }

    /// Analyse `image`, write scripts and expand the script at
    /// `script_index` into Veo prompts.
    ///
    /// An empty product description in `config` is filled from the analysis.
    pub async fn run(
        &self,
        image: &InlineImage,
        mut config: ScriptConfig,
        script_index: usize,
    ) -> Result<Storyboard> {
        info!("Analysing product image");
        let vision = studio::analyze_image_in(&self.client, image, config.language).await?;

        let product_description = vision.product_description();
        if config.product_description.trim().is_empty() {
            config.product_description = product_description.clone();
        }
        config.vision = Some(vision.clone());

        info!("Generating scripts for '{}'", config.product_name);
        let scripts = studio::generate_scripts(&self.client, &config).await?;

        let script = scripts.get(script_index).ok_or_else(|| {
            Error::InvalidRequest(format!(
                "script {} requested but only {} were generated",
                script_index + 1,
                scripts.len()
            ))
        })?;

        info!("Generating Veo prompts for '{}'", script.title);
        let veo = studio::generate_veo_prompts(&self.client, script, &config).await?;

        Ok(Storyboard {
            vision,
            product_description,
            scripts,
            selected_script: script_index,
            veo,
        })
    }
}
