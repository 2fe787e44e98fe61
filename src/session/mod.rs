//! Annotator session gate
//!
//! Captures who is annotating before any comment can be written. Identities
//! are captured, not authenticated. Once locked, the id cannot change until
//! the session is reset.

use serde::Serialize;

use crate::error::ValidationError;

/// The identity of the human annotating the current document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatorSession {
    #[serde(rename = "annotatorId")]
    annotator_id: String,
    locked: bool,
}

impl AnnotatorSession {
    /// An empty, unlocked session
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirm an annotator id and freeze it
    ///
    /// Whitespace-only ids and relocking are rejected without changing the session.
    pub fn lock(&mut self, annotator_id: &str) -> Result<&Self, ValidationError> {
        if self.locked {
            return Err(ValidationError::SessionAlreadyLocked(self.annotator_id.clone()));
        }
        let trimmed = annotator_id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAnnotatorId);
        }

        self.annotator_id = trimmed.to_string();
        self.locked = true;
        tracing::info!("Annotator session locked for {}", self.annotator_id);
        Ok(self)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The locked annotator id
    pub fn annotator_id(&self) -> Option<&str> {
        self.locked.then_some(self.annotator_id.as_str())
    }

    /// The author id for a mutation, or the reason mutations are refused
    pub fn author(&self) -> Result<&str, ValidationError> {
        self.annotator_id().ok_or(ValidationError::SessionNotLocked)
    }

    /// Forget the annotator entirely
    pub fn reset(&mut self) {
        self.annotator_id.clear();
        self.locked = false;
    }
}
