//! AI service integration for image analysis
//!
//! Builds multimodal requests for Gemini's `generateContent` API and turns the
//! replies into typed results.

pub mod gemini;
pub mod interpret;
pub mod mime;
pub mod mock;
pub mod request;
pub mod schema;

pub use gemini::GeminiVisionClient;
pub use mock::MockVisionClient;
pub use request::{build_image_part, build_text_part, EncodedImagePart, TextPart};

use crate::models::{AnalysisResult, PromptSuggestions, TextExtractionResult};
use crate::Result;
use async_trait::async_trait;

/// The three independent calls made against an encoded image.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze(&self, image: &EncodedImagePart, prompt: &str) -> Result<AnalysisResult>;
    async fn extract_text(&self, image: &EncodedImagePart) -> Result<TextExtractionResult>;
    async fn suggest_prompts(&self, image: &EncodedImagePart) -> Result<PromptSuggestions>;
}
