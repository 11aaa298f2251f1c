//! Request construction: turns an [`ImageBlob`] and a prompt into content parts.

use super::gemini::types::{InlineData, Part};
use super::mime::detect_image_mime;
use crate::models::{BlobSource, ImageBlob};
use crate::{Error, Result};
use base64::Engine as _;
use tokio::io::AsyncReadExt;

/// Image bytes encoded as base64 text, paired with the original MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImagePart {
    pub mime_type: String,
    pub data: String,
}

impl EncodedImagePart {
    /// Decodes the base64 payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Encoding(format!("Invalid base64 image payload: {}", e)))
    }
}

impl From<EncodedImagePart> for Part {
    fn from(part: EncodedImagePart) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: part.mime_type,
                data: part.data,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPart {
    pub text: String,
}

impl From<TextPart> for Part {
    fn from(part: TextPart) -> Self {
        Part::Text { text: part.text }
    }
}

async fn read_blob(source: BlobSource) -> std::io::Result<Vec<u8>> {
    match source {
        BlobSource::Bytes(bytes) => Ok(bytes),
        BlobSource::File(path) => tokio::fs::read(&path).await,
        BlobSource::Reader(mut reader) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            Ok(bytes)
        }
    }
}

/// Reads the blob fully into memory and base64-encodes it.
///
/// A blank MIME type is replaced by one sniffed from the image bytes.
pub async fn build_image_part(blob: ImageBlob) -> Result<EncodedImagePart> {
    let ImageBlob { source, mime_type } = blob;

    let bytes = read_blob(source).await.map_err(|e| {
        tracing::error!("Failed to read image: {}", e);
        Error::Encoding(format!("Failed to read image: {}", e))
    })?;

    if bytes.is_empty() {
        return Err(Error::Encoding("Image is empty".to_string()));
    }

    let mime_type = if mime_type.trim().is_empty() {
        detect_image_mime(&bytes).to_string()
    } else {
        mime_type
    };

    tracing::debug!("Encoded image ({} bytes, {})", bytes.len(), mime_type);

    Ok(EncodedImagePart {
        mime_type,
        data: base64::engine::general_purpose::STANDARD.encode(&bytes),
    })
}

pub fn build_text_part(prompt: &str) -> TextPart {
    TextPart {
        text: prompt.to_string(),
    }
}
