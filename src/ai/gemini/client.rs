use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::models::DEFAULT_BASE_URL;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Lightweight Gemini REST client for the `generateContent` endpoint.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` may be given with or without the `models/` prefix.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Calls `generateContent` and returns the decoded response envelope.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!(
            "Sending generateContent request ({} content parts) to {}",
            request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .inspect_err(|e| tracing::error!("Gemini request did not complete: {}", e))?;

        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }
}

/// Maps a raw HTTP reply onto the response envelope. Any non-2xx status or an
/// undecodable body is a service failure.
fn decode_envelope(status: StatusCode, body: &str) -> Result<GenerateContentResponse> {
    if !status.is_success() {
        tracing::error!("Gemini rejected the request (status {}): {}", status, body);
        return Err(Error::Service(format!(
            "Gemini returned status {}: {}",
            status,
            body.trim()
        )));
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!("Undecodable Gemini envelope: {}\nBody: {}", e, body);
        Error::Service(format!("Unexpected Gemini response body: {}", e))
    })
}
