use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::ai::interpret::{interpret_analysis, interpret_suggestions, interpret_text};
use crate::ai::request::{build_text_part, EncodedImagePart};
use crate::ai::{schema, VisionService};
use crate::models::{AnalysisResult, Config, PromptSuggestions, TextExtractionResult};
use crate::{prompts, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Gemini-backed implementation of the three image calls.
pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(
            GeminiHttpClient::new_with_client(
                config.api_key.clone(),
                config.model.clone(),
                config.timeout,
                client,
            )
            .with_base_url(config.base_url.clone()),
        )
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// Builds one call: image first, then the instruction text.
    fn build_request(
        image: &EncodedImagePart,
        instruction: &str,
        schema: Option<Value>,
        system: Option<&str>,
    ) -> GenerateContentRequest {
        let generation_config = schema.map(|schema| GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        });

        GenerateContentRequest {
            system_instruction: system.map(Content::system),
            contents: vec![Content::user(vec![
                Part::from(image.clone()),
                Part::from(build_text_part(instruction)),
            ])],
            generation_config,
        }
    }

    async fn reply_text(&self, request: &GenerateContentRequest) -> Result<Option<String>> {
        let response = self.http.generate_content(request).await?;
        Ok(response.text())
    }
}

#[async_trait]
impl VisionService for GeminiVisionClient {
    async fn analyze(&self, image: &EncodedImagePart, prompt: &str) -> Result<AnalysisResult> {
        let request = Self::build_request(
            image,
            &prompts::analysis_instruction(prompt),
            Some(schema::analysis()),
            Some(prompts::ANALYZE_SYSTEM),
        );

        let reply = self.reply_text(&request).await?;
        let analysis = interpret_analysis(reply.as_deref())?;
        tracing::info!(
            "Analysis complete: '{}' ({} objects, {} colors)",
            analysis.title,
            analysis.detected_objects.len(),
            analysis.color_palette.len()
        );
        Ok(analysis)
    }

    async fn extract_text(&self, image: &EncodedImagePart) -> Result<TextExtractionResult> {
        let request = Self::build_request(image, prompts::EXTRACT_TEXT, None, None);

        let reply = self.reply_text(&request).await?;
        let extracted = interpret_text(reply.as_deref())?;
        tracing::info!("Text extraction complete ({} chars)", extracted.text.len());
        Ok(extracted)
    }

    async fn suggest_prompts(&self, image: &EncodedImagePart) -> Result<PromptSuggestions> {
        let request =
            Self::build_request(image, prompts::SUGGEST_PROMPTS, Some(schema::suggestions()), None);

        let reply = self.reply_text(&request).await?;
        interpret_suggestions(reply.as_deref())
    }
}
