//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image encoding error: {0}")]
    Encoding(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("AI service error: {0}")]
    Service(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the outbound call itself (transport, status, envelope).
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_) | Error::Http(_))
    }

    /// Single message shown to the user when an action fails.
    pub fn user_message(&self) -> String {
        match self {
            Error::Encoding(_) | Error::Io(_) => {
                "Could not read the selected image. Please choose another file.".to_string()
            }
            Error::EmptyResponse => {
                "The model returned an empty response. Please try again.".to_string()
            }
            Error::MalformedResponse(_) | Error::Serialization(_) => {
                "The model returned a response that could not be understood. Please try again."
                    .to_string()
            }
            Error::Service(_) | Error::Http(_) => {
                format!("Failed to analyze image: {}", self)
            }
            Error::Config(msg) => format!("Configuration problem: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
