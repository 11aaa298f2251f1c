//! Response interpretation: normalizes a raw model reply into a typed result.
//!
//! Structured replies go through the same steps: reject an empty reply, trim,
//! strip an optional fence marker at the very start and end, then deserialize.
//! The fence handling is pattern removal, not markdown parsing.

use crate::models::{is_hex_color, AnalysisResult, PromptSuggestions, TextExtractionResult};
use crate::{Error, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+.-]*").expect("valid leading fence regex"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("valid trailing fence regex"));

/// Removes one leading and one trailing fence marker from a trimmed reply.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(m) = LEADING_FENCE.find(body) {
        body = &body[m.end()..];
    }
    if let Some(m) = TRAILING_FENCE.find(body) {
        body = &body[..m.start()];
    }
    body.trim()
}

fn non_empty(raw: Option<&str>) -> Result<&str> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(Error::EmptyResponse),
    }
}

/// Parses a structured reply into `T`.
pub fn parse_structured<T: DeserializeOwned>(raw: Option<&str>) -> Result<T> {
    let text = non_empty(raw)?;
    let body = strip_code_fence(text);

    serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse model reply: {}\nReply: {}", e, text);
        Error::MalformedResponse(e.to_string())
    })
}

pub fn interpret_analysis(raw: Option<&str>) -> Result<AnalysisResult> {
    let mut analysis: AnalysisResult = parse_structured(raw)?;

    let before = analysis.color_palette.len();
    analysis.color_palette.retain(|color| is_hex_color(color));
    if analysis.color_palette.len() != before {
        tracing::warn!(
            "Dropped {} palette entries that are not #RRGGBB",
            before - analysis.color_palette.len()
        );
    }

    let objects = analysis.detected_objects.len();
    if !(3..=5).contains(&objects) {
        tracing::warn!("Model returned {} detected objects, expected 3-5", objects);
    }

    Ok(analysis)
}

pub fn interpret_suggestions(raw: Option<&str>) -> Result<PromptSuggestions> {
    let suggestions: PromptSuggestions = parse_structured(raw)?;

    let count = suggestions.suggestions.len();
    if !(3..=4).contains(&count) {
        tracing::warn!("Model returned {} prompt suggestions, expected 3-4", count);
    }

    Ok(suggestions)
}

/// Free-text path: returns the trimmed reply without fence stripping or
/// parsing. A missing or empty reply is an error; a whitespace-only reply
/// trims to an empty result, meaning the image holds no text.
pub fn interpret_text(raw: Option<&str>) -> Result<TextExtractionResult> {
    let text = match raw {
        Some(text) if !text.is_empty() => text,
        _ => return Err(Error::EmptyResponse),
    };
    Ok(TextExtractionResult {
        text: text.trim().to_string(),
    })
}
