//! Application orchestration for the image actions.

use crate::ai::{build_image_part, EncodedImagePart, GeminiVisionClient, VisionService};
use crate::models::{
    AnalysisResult, Config, ImageBlob, Insight, PromptSuggestions, TextExtractionResult,
};
use crate::session::{Command, SessionEvent};
use crate::Result;
use tracing::{error, info};

/// Runs image actions against a [`VisionService`].
pub struct App {
    vision: Box<dyn VisionService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub vision: Box<dyn VisionService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            vision: services.vision,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        info!("Vision provider: Gemini (model: {})", config.model);
        let client = GeminiVisionClient::from_config(config, reqwest::Client::new());
        Self::with_services(AppServices {
            vision: Box::new(client),
        })
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub async fn analyze(&self, image: &EncodedImagePart, prompt: &str) -> Result<AnalysisResult> {
        self.vision.analyze(image, prompt).await
    }

    pub async fn extract_text(&self, image: &EncodedImagePart) -> Result<TextExtractionResult> {
        self.vision.extract_text(image).await
    }

    pub async fn suggest_prompts(&self, image: &EncodedImagePart) -> Result<PromptSuggestions> {
        self.vision.suggest_prompts(image).await
    }

    /// Issues analyze and extract concurrently and waits for both to settle.
    ///
    /// The action fails as a whole if either call fails; the other result is
    /// discarded.
    pub async fn analyze_and_extract_encoded(
        &self,
        image: &EncodedImagePart,
        prompt: &str,
    ) -> Result<Insight> {
        let (analysis, text) = tokio::join!(self.analyze(image, prompt), self.extract_text(image));

        match (analysis, text) {
            (Ok(analysis), Ok(text)) => {
                info!(
                    "Insight ready: '{}' with {} chars of text",
                    analysis.title,
                    text.text.len()
                );
                Ok(Insight { analysis, text })
            }
            (Err(e), other) => {
                if other.is_ok() {
                    info!("Discarding extracted text because analysis failed");
                }
                error!("Image analysis failed: {}", e);
                Err(e)
            }
            (Ok(_), Err(e)) => {
                error!("Text extraction failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn analyze_and_extract(&self, blob: ImageBlob, prompt: &str) -> Result<Insight> {
        let image = build_image_part(blob).await?;
        self.analyze_and_extract_encoded(&image, prompt).await
    }

    pub async fn suggest_for(&self, blob: ImageBlob) -> Result<PromptSuggestions> {
        let image = build_image_part(blob).await?;
        self.suggest_prompts(&image).await
    }

    /// Runs a session command and returns the event that settles it.
    pub async fn execute(&self, command: Command) -> SessionEvent {
        match command {
            Command::Analyze {
                generation,
                image,
                prompt,
            } => {
                let outcome = self.analyze_and_extract_encoded(&image, &prompt).await;
                SessionEvent::settled(generation, outcome)
            }
        }
    }
}
