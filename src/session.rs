//! Presentation state for one user session.
//!
//! All state lives in [`Session`] and changes only through [`Session::apply`].
//! Every analyze request carries a generation number; a settled outcome is
//! applied only if its generation is still the latest one, so a stale reply
//! can neither overwrite newer results nor clear the loading flag of a newer
//! request.

use crate::ai::EncodedImagePart;
use crate::models::Insight;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Interactive,
    Loading { generation: u64 },
}

/// The image currently on screen. Dropping it releases its preview.
#[derive(Debug)]
pub struct SelectedImage {
    pub id: u64,
    pub image: EncodedImagePart,
}

impl Drop for SelectedImage {
    fn drop(&mut self) {
        debug!("Released image preview {}", self.id);
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    ImageSelected(EncodedImagePart),
    PromptChanged(String),
    AnalyzeRequested,
    AnalyzeSettled {
        generation: u64,
        /// Insight on success, user-visible message on failure.
        outcome: std::result::Result<Insight, String>,
    },
    Reset,
}

impl SessionEvent {
    pub fn settled(generation: u64, outcome: crate::Result<Insight>) -> Self {
        SessionEvent::AnalyzeSettled {
            generation,
            outcome: outcome.map_err(|e| e.user_message()),
        }
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Analyze {
        generation: u64,
        image: EncodedImagePart,
        prompt: String,
    },
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    image: Option<SelectedImage>,
    prompt: String,
    insight: Option<Insight>,
    error: Option<String>,
    next_image_id: u64,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Empty,
            image: None,
            prompt: String::new(),
            insight: None,
            error: None,
            next_image_id: 1,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn insight(&self) -> Option<&Insight> {
        self.insight.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies an event and returns the command it triggers, if any.
    pub fn apply(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::ImageSelected(image) => {
                let id = self.next_image_id;
                self.next_image_id += 1;
                // Replacing the old image releases it; any in-flight request
                // belongs to that image and is superseded.
                self.image = Some(SelectedImage { id, image });
                self.generation += 1;
                self.insight = None;
                self.error = None;
                self.phase = Phase::Interactive;
                None
            }
            SessionEvent::PromptChanged(prompt) => {
                self.prompt = prompt;
                None
            }
            SessionEvent::AnalyzeRequested => {
                let image = match &self.image {
                    Some(selected) => selected.image.clone(),
                    None => {
                        warn!("Analyze requested with no image selected");
                        return None;
                    }
                };

                self.generation += 1;
                self.insight = None;
                self.error = None;
                self.phase = Phase::Loading {
                    generation: self.generation,
                };

                Some(Command::Analyze {
                    generation: self.generation,
                    image,
                    prompt: self.prompt.clone(),
                })
            }
            SessionEvent::AnalyzeSettled {
                generation,
                outcome,
            } => {
                if self.phase != (Phase::Loading { generation }) {
                    debug!("Discarding stale result for request {}", generation);
                    return None;
                }

                match outcome {
                    Ok(insight) => self.insight = Some(insight),
                    Err(message) => self.error = Some(message),
                }
                self.phase = Phase::Interactive;
                None
            }
            SessionEvent::Reset => {
                self.image = None;
                self.prompt.clear();
                self.insight = None;
                self.error = None;
                self.generation += 1;
                self.phase = Phase::Empty;
                None
            }
        }
    }
}
