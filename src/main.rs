use anyhow::{Context, Result};
use clap::Parser;
use fashion_ai_generator::ai::InlineImage;
use fashion_ai_generator::app::App;
use fashion_ai_generator::models::{Accent, Config, Language, ScriptConfig, VideoStyle, VideoType};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fashion-ai-generator")]
#[command(about = "Turn a product photo into video scripts and Veo prompts")]
struct CliArgs {
    /// Product photo (JPEG, PNG, WebP or GIF).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    #[arg(long, default_value = "")]
    name: String,

    /// Product description; generated from the photo when omitted.
    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, value_enum, default_value_t)]
    style: VideoStyle,

    #[arg(long, value_enum, default_value_t)]
    video_type: VideoType,

    #[arg(long, value_enum, default_value_t)]
    language: Language,

    #[arg(long, value_enum, default_value_t)]
    accent: Accent,

    /// Which generated script (1-based) to expand into Veo prompts.
    #[arg(long, default_value_t = 1, value_parser = parse_script_number)]
    script: usize,

    /// Write the JSON result here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn parse_script_number(input: &str) -> std::result::Result<usize, String> {
    match input.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!(
            "Invalid script number '{}'. Expected a number starting at 1",
            input
        )),
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = Config::from_env()?;
    let app = App::new(&config)?;

    let image = InlineImage::from_file(&args.image)
        .with_context(|| format!("reading {}", args.image.display()))?;

    let script_config = ScriptConfig {
        product_name: args.name,
        product_description: args.description,
        vision: None,
        video_style: args.style,
        video_type: args.video_type,
        language: args.language,
        accent: args.accent,
    };

    let storyboard = app.run(&image, script_config, args.script - 1).await?;
    let json = serde_json::to_string_pretty(&storyboard)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Wrote storyboard to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fashion_ai_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting fashion-ai-generator");

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => {
            info!("Generation completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
