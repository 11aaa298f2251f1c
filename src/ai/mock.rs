use super::interpret::{interpret_analysis, interpret_suggestions, interpret_text};
use super::request::EncodedImagePart;
use super::VisionService;
use crate::models::{AnalysisResult, PromptSuggestions, TextExtractionResult};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const DEFAULT_ANALYSIS_REPLY: &str = r##"{
    "title": "Mock scene",
    "summary": "A placeholder analysis.",
    "detected_objects": [
        {"name": "tree", "icon": "park"},
        {"name": "bench", "icon": "chair"},
        {"name": "bird", "icon": "flutter_dash"}
    ],
    "color_palette": ["#2E7D32", "#8D6E63", "#90CAF9"]
}"##;

const DEFAULT_SUGGESTIONS_REPLY: &str =
    r#"{"suggestions": ["What season is it?", "Describe the mood", "Write a caption"]}"#;

/// Failure injected for one of the mock calls.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Service(String),
    Empty,
}

impl MockFailure {
    fn to_error(&self) -> Error {
        match self {
            MockFailure::Service(msg) => Error::Service(msg.clone()),
            MockFailure::Empty => Error::EmptyResponse,
        }
    }
}

/// In-memory [`VisionService`] that feeds raw replies through the real
/// interpreter, so fenced or malformed replies behave as they would live.
#[derive(Clone, Default)]
pub struct MockVisionClient {
    analysis_replies: Arc<Mutex<Vec<String>>>,
    text_replies: Arc<Mutex<Vec<String>>>,
    suggestion_replies: Arc<Mutex<Vec<String>>>,
    analyze_failure: Arc<Mutex<Option<MockFailure>>>,
    extract_failure: Arc<Mutex<Option<MockFailure>>>,
    suggest_failure: Arc<Mutex<Option<MockFailure>>>,
    analyze_delay: Option<Duration>,
    extract_delay: Option<Duration>,
    call_count: Arc<Mutex<usize>>,
    analyze_calls: Arc<Mutex<usize>>,
    extract_calls: Arc<Mutex<usize>>,
    suggest_calls: Arc<Mutex<usize>>,
    completed_count: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis_reply(self, reply: impl Into<String>) -> Self {
        self.analysis_replies.lock().unwrap().push(reply.into());
        self
    }

    pub fn with_text_reply(self, reply: impl Into<String>) -> Self {
        self.text_replies.lock().unwrap().push(reply.into());
        self
    }

    pub fn with_suggestions_reply(self, reply: impl Into<String>) -> Self {
        self.suggestion_replies.lock().unwrap().push(reply.into());
        self
    }

    pub fn with_analyze_failure(self, failure: MockFailure) -> Self {
        *self.analyze_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_extract_failure(self, failure: MockFailure) -> Self {
        *self.extract_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_suggest_failure(self, failure: MockFailure) -> Self {
        *self.suggest_failure.lock().unwrap() = Some(failure);
        self
    }

    pub fn with_analyze_delay(mut self, delay: Duration) -> Self {
        self.analyze_delay = Some(delay);
        self
    }

    pub fn with_extract_delay(mut self, delay: Duration) -> Self {
        self.extract_delay = Some(delay);
        self
    }

    /// Number of calls started.
    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Number of calls that ran to completion, successful or not.
    pub fn get_completed_count(&self) -> usize {
        *self.completed_count.lock().unwrap()
    }

    /// Prompts passed to `analyze`, in call order.
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Counts the call and returns its 1-based index among calls of the
    /// same method.
    fn start_call(&self, method_calls: &Arc<Mutex<usize>>) -> usize {
        *self.call_count.lock().unwrap() += 1;
        let mut count = method_calls.lock().unwrap();
        *count += 1;
        *count
    }

    fn finish_call(&self) {
        *self.completed_count.lock().unwrap() += 1;
    }

    fn pick_reply(replies: &Arc<Mutex<Vec<String>>>, call: usize, default: &str) -> String {
        let replies = replies.lock().unwrap();
        if replies.is_empty() {
            default.to_string()
        } else {
            replies[(call - 1) % replies.len()].clone()
        }
    }

    async fn settle<T>(
        &self,
        delay: Option<Duration>,
        failure: &Arc<Mutex<Option<MockFailure>>>,
        interpret: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = failure.lock().unwrap().clone();
        let result = match failure {
            Some(failure) => Err(failure.to_error()),
            None => interpret(),
        };
        self.finish_call();
        result
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn analyze(&self, _image: &EncodedImagePart, prompt: &str) -> Result<AnalysisResult> {
        let call = self.start_call(&self.analyze_calls);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = Self::pick_reply(&self.analysis_replies, call, DEFAULT_ANALYSIS_REPLY);

        self.settle(self.analyze_delay, &self.analyze_failure, || {
            interpret_analysis(Some(&reply))
        })
        .await
    }

    async fn extract_text(&self, _image: &EncodedImagePart) -> Result<TextExtractionResult> {
        let call = self.start_call(&self.extract_calls);
        // A whitespace reply is how the model says the image holds no text.
        let reply = Self::pick_reply(&self.text_replies, call, "\n");

        self.settle(self.extract_delay, &self.extract_failure, || {
            interpret_text(Some(&reply))
        })
        .await
    }

    async fn suggest_prompts(&self, _image: &EncodedImagePart) -> Result<PromptSuggestions> {
        let call = self.start_call(&self.suggest_calls);
        let reply = Self::pick_reply(&self.suggestion_replies, call, DEFAULT_SUGGESTIONS_REPLY);

        self.settle(None, &self.suggest_failure, || {
            interpret_suggestions(Some(&reply))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImagePart {
        EncodedImagePart {
            mime_type: "image/png".to_string(),
            data: "AA==".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_default_replies_parse() {
        let client = MockVisionClient::new();

        let analysis = client.analyze(&image(), "").await.unwrap();
        assert_eq!(analysis.title, "Mock scene");
        assert_eq!(analysis.detected_objects.len(), 3);

        let text = client.extract_text(&image()).await.unwrap();
        assert_eq!(text.text, "");

        let suggestions = client.suggest_prompts(&image()).await.unwrap();
        assert_eq!(suggestions.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_runs_replies_through_interpreter() {
        let client = MockVisionClient::new()
            .with_suggestions_reply("```json\n{\"suggestions\":[\"a\",\"b\",\"c\"]}\n```")
            .with_analysis_reply("not json");

        let suggestions = client.suggest_prompts(&image()).await.unwrap();
        assert_eq!(suggestions.suggestions, vec!["a", "b", "c"]);

        let err = client.analyze(&image(), "").await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_mock_injected_failure() {
        let client = MockVisionClient::new()
            .with_extract_failure(MockFailure::Service("network down".to_string()));

        let err = client.extract_text(&image()).await.unwrap_err();
        assert!(matches!(err, Error::Service(_)));
        assert_eq!(client.get_call_count(), 1);
        assert_eq!(client.get_completed_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_cycles_each_method_independently() {
        let client = MockVisionClient::new()
            .with_analysis_reply(r#"{"title":"first","summary":"","detected_objects":[],"color_palette":[]}"#)
            .with_analysis_reply(r#"{"title":"second","summary":"","detected_objects":[],"color_palette":[]}"#)
            .with_text_reply("words");

        assert_eq!(client.analyze(&image(), "").await.unwrap().title, "first");
        client.extract_text(&image()).await.unwrap();
        client.suggest_prompts(&image()).await.unwrap();
        assert_eq!(client.analyze(&image(), "").await.unwrap().title, "second");
        assert_eq!(client.analyze(&image(), "").await.unwrap().title, "first");
        assert_eq!(client.get_call_count(), 5);
    }

    #[tokio::test]
    async fn test_mock_empty_text_reply_is_empty_response() {
        let client = MockVisionClient::new().with_text_reply("");

        let err = client.extract_text(&image()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let client = MockVisionClient::new();
        client.analyze(&image(), "first").await.unwrap();
        client.analyze(&image(), "second").await.unwrap();

        assert_eq!(client.get_prompts(), vec!["first", "second"]);
        assert_eq!(client.get_call_count(), 2);
    }
}
