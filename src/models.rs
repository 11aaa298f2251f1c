//! Data models and structures
//!
//! Defines the image input, the three result shapes returned by the model,
//! and the environment configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncRead;

/// Where the bytes of an [`ImageBlob`] come from.
pub enum BlobSource {
    Bytes(Vec<u8>),
    File(PathBuf),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

/// Opaque image payload plus its MIME type.
///
/// A blob is consumed by the request builder and never persisted.
pub struct ImageBlob {
    pub source: BlobSource,
    pub mime_type: String,
}

impl ImageBlob {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            source: BlobSource::Bytes(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            source: BlobSource::File(path.into()),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_reader(
        reader: impl AsyncRead + Send + Unpin + 'static,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source: BlobSource::Reader(Box::new(reader)),
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            BlobSource::Bytes(bytes) => format!("Bytes({} bytes)", bytes.len()),
            BlobSource::File(path) => format!("File({})", path.display()),
            BlobSource::Reader(_) => "Reader".to_string(),
        };
        f.debug_struct("ImageBlob")
            .field("source", &source)
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectedObject {
    pub name: String,
    /// Icon key chosen by the model for this object.
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub title: String,
    pub summary: String,
    pub detected_objects: Vec<DetectedObject>,
    pub color_palette: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextExtractionResult {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptSuggestions {
    pub suggestions: Vec<String>,
}

/// Result of the joint analyze + extract action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub analysis: AnalysisResult,
    pub text: TextExtractionResult,
}

/// Returns true when `value` is exactly `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    crate::Error::Config(format!(
                        "GEMINI_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_analysis_result_wire_names() {
        let json = r##"{
            "title": "Harbor at dusk",
            "summary": "Boats moored in a calm harbor.",
            "detected_objects": [{"name": "boat", "icon": "sailing"}],
            "color_palette": ["#1A2B3C", "#FFAA00"]
        }"##;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.detected_objects[0].icon, "sailing");
        assert_eq!(result.color_palette.len(), 2);
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("a1b2c3"));
        assert!(!is_hex_color("#abc"));
        assert!(!is_hex_color("#gg0000"));
        assert!(!is_hex_color("#1234567"));
    }

    #[test]
    fn test_image_blob_debug_hides_payload() {
        let blob = ImageBlob::from_bytes(vec![1, 2, 3], "image/png");
        let debug = format!("{:?}", blob);
        assert!(debug.contains("3 bytes"));
        assert!(debug.contains("image/png"));
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "key")])).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_falls_back_to_generic_api_key() {
        let config = Config::from_lookup(lookup_from(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("GEMINI_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
