use anyhow::Result;
use clap::{Parser, Subcommand};
use image_insight::ai::{build_image_part, mime::mime_from_extension};
use image_insight::app::App;
use image_insight::models::{Config, ImageBlob, Insight, PromptSuggestions};
use image_insight::session::{Session, SessionEvent};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-insight")]
#[command(about = "Analyze images with a multimodal AI model")]
struct CliArgs {
    /// Model ID to use instead of GEMINI_MODEL.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Describe an image and extract its text.
    Analyze {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Extra instructions for the analysis.
        #[arg(short, long, default_value = "")]
        prompt: String,
    },
    /// Extract the text visible in an image.
    Extract {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Suggest prompts to ask about an image.
    Suggest {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}

fn blob_for_path(path: &Path) -> ImageBlob {
    // A blank MIME type is sniffed from the bytes when the extension is unknown.
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_from_extension)
        .unwrap_or("");
    ImageBlob::from_path(path, mime_type)
}

fn print_insight(insight: &Insight) {
    let analysis = &insight.analysis;
    println!("{}\n", analysis.title);
    println!("{}\n", analysis.summary);

    println!("Objects:");
    for object in &analysis.detected_objects {
        println!("  [{}] {}", object.icon, object.name);
    }

    println!("\nPalette: {}", analysis.color_palette.join(" "));

    println!("\nText:");
    if insight.text.text.is_empty() {
        println!("  (no text found)");
    } else {
        for line in insight.text.text.lines() {
            println!("  {}", line);
        }
    }
}

fn print_suggestions(suggestions: &PromptSuggestions) {
    for (i, suggestion) in suggestions.suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, suggestion);
    }
}

/// A failed action: detail for the log, message for the user.
#[derive(Debug, thiserror::Error)]
#[error("{detail}")]
struct ActionError {
    detail: String,
    message: String,
}

impl From<image_insight::Error> for ActionError {
    fn from(e: image_insight::Error) -> Self {
        Self {
            detail: e.to_string(),
            message: e.user_message(),
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(e: serde_json::Error) -> Self {
        image_insight::Error::from(e).into()
    }
}

async fn run(app: &App, command: CliCommand, json: bool) -> Result<(), ActionError> {
    match command {
        CliCommand::Analyze { image, prompt } => {
            let encoded = build_image_part(blob_for_path(&image)).await?;

            let mut session = Session::new();
            session.apply(SessionEvent::ImageSelected(encoded));
            session.apply(SessionEvent::PromptChanged(prompt));
            if let Some(command) = session.apply(SessionEvent::AnalyzeRequested) {
                let settled = app.execute(command).await;
                session.apply(settled);
            }

            if let Some(message) = session.error() {
                return Err(ActionError {
                    detail: format!("analysis of {} failed", image.display()),
                    message: message.to_string(),
                });
            }
            if let Some(insight) = session.insight() {
                if json {
                    println!("{}", serde_json::to_string_pretty(insight)?);
                } else {
                    print_insight(insight);
                }
            }
        }
        CliCommand::Extract { image } => {
            let encoded = build_image_part(blob_for_path(&image)).await?;
            let extracted = app.extract_text(&encoded).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&extracted)?);
            } else {
                println!("{}", extracted.text);
            }
        }
        CliCommand::Suggest { image } => {
            let suggestions = app.suggest_for(blob_for_path(&image)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                print_suggestions(&suggestions);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_insight=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(model) = args.model {
        config.model = model;
    }

    let app = App::from_config(&config);

    match run(&app, args.command, args.json).await {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("Action failed: {}", e);
            eprintln!("{}", e.message);
            std::process::exit(1);
        }
    }
}
