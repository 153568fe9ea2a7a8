//! Data models and structures
//!
//! Defines the vision analysis, script and Veo prompt shapes returned by the
//! generator, the script configuration chosen by the user, and the runtime
//! configuration read from the environment.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToneScore {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisionAnalysis {
    pub category: String,
    pub color_tone: String,
    pub style: String,
    pub target_age: String,
    pub brand_tone: String,
    pub usp_highlights: Vec<String>,
    pub tone_scores: Vec<ToneScore>,
}

impl VisionAnalysis {
    /// Product description pre-filled from the analysis.
    pub fn product_description(&self) -> String {
        let mut description = format!(
            "A {} in {} style with a {} palette. Suited to ages {}. Tone: {}.",
            self.category, self.style, self.color_tone, self.target_age, self.brand_tone
        );
        if !self.usp_highlights.is_empty() {
            description.push_str("\n\nHighlights:\n- ");
            description.push_str(&self.usp_highlights.join("\n- "));
        }
        description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scene {
    pub time: String,
    pub action: String,
    pub dialogue_or_text: String,
    pub camera_angle: String,
    pub visual_prompt: String,
    pub music: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Script {
    pub id: String,
    pub title: String,
    pub hook: String,
    pub rationale: String,
    pub benefits_highlighted: Vec<String>,
    pub cta_overlay: String,
    pub cta_voice: String,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterAppearance {
    pub hair: String,
    pub expression: String,
    pub outfit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VeoCharacter {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub ethnicity: String,
    pub appearance: CharacterAppearance,
}

/// Cinematic description of one scene, fed to a video model as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VeoScenePrompt {
    pub description: String,
    pub style: String,
    pub camera: String,
    pub lighting: String,
    pub environment: String,
    pub characters: Vec<VeoCharacter>,
    pub motion: String,
    pub dialogue: Vec<String>,
    pub ending: String,
    pub text: String,
    pub keywords: Vec<String>,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVeoData {
    pub scene_prompts: Vec<VeoScenePrompt>,
    pub ads_caption: String,
    pub hashtags: Vec<String>,
    pub cta_variations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VideoStyle {
    #[default]
    Cinematic,
    Lifestyle,
    Review,
    Trendy,
    /// Music and on-screen text only, nothing spoken.
    NoDialogue,
}

impl VideoStyle {
    pub fn is_no_dialogue(self) -> bool {
        self == VideoStyle::NoDialogue
    }
}

impl fmt::Display for VideoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VideoStyle::Cinematic => "Cinematic, high fashion",
            VideoStyle::Lifestyle => "Everyday lifestyle",
            VideoStyle::Review => "Honest review",
            VideoStyle::Trendy => "Trendy, fast-paced",
            VideoStyle::NoDialogue => "No dialogue (music and text only)",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VideoType {
    #[default]
    ShortForm,
    Lookbook,
    TryOn,
    Unboxing,
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VideoType::ShortForm => "TikTok / Reels short",
            VideoType::Lookbook => "Lookbook",
            VideoType::TryOn => "Try-on haul",
            VideoType::Unboxing => "Unboxing",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    Vietnamese,
    English,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Vietnamese => "Vietnamese",
            Language::English => "English",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Accent {
    #[default]
    Northern,
    Southern,
    Neutral,
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Accent::Northern => "Northern",
            Accent::Southern => "Southern",
            Accent::Neutral => "Neutral",
        })
    }
}

/// User selections that shape script and Veo prompt generation.
#[derive(Debug, Clone, Default)]
pub struct ScriptConfig {
    pub product_name: String,
    pub product_description: String,
    pub vision: Option<VisionAnalysis>,
    pub video_style: VideoStyle,
    pub video_type: VideoType,
    pub language: Language,
    pub accent: Accent,
}

// Configuration
pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub models: Vec<String>,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub fallback_backoff: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let models: Vec<String> = match var("GEMINI_MODELS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        if models.is_empty() {
            return Err(crate::Error::Config(
                "GEMINI_MODELS must name at least one model".to_string(),
            ));
        }

        let parse_u64 = |key: &str, default: u64| -> crate::Result<u64> {
            match var(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    crate::Error::Config(format!("{} must be a whole number, got '{}'", key, raw))
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            gemini_api_key,
            models,
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| crate::ai::gemini::client::DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(parse_u64("GEMINI_TIMEOUT_SECS", 60)?),
            fallback_backoff: Duration::from_millis(parse_u64("FALLBACK_BACKOFF_MS", 1000)?),
        })
    }
}
