//! Image insight - multimodal image analysis backed by Gemini
//!
//! Sends an uploaded image to a generative-AI service and turns the reply
//! into typed results: a title and summary, detected objects, a color
//! palette, extracted text, and prompt suggestions.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
