//! Sync data types
//!
//! Wire types shared by the sync adapter and the reference backend. Field
//! names are snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotations::Comment;
use crate::document::DocumentKey;

/// The "submit annotation" payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationPayload {
    pub instance_id: String,
    pub agent_id: String,
    pub annotator_id: String,
    pub comment_text: String,
    pub selection_text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl AnnotationPayload {
    /// Serialize a comment for the document it was made on
    pub fn for_comment(document: &DocumentKey, comment: &Comment) -> Self {
        Self {
            instance_id: document.instance_id.clone(),
            agent_id: document.agent_id.clone(),
            annotator_id: comment.author_id.clone(),
            comment_text: comment.body.clone(),
            selection_text: comment.anchor.snapshot_text.clone(),
            start_offset: comment.anchor.start_offset,
            end_offset: comment.anchor.end_offset,
        }
    }
}

/// A stored annotation as returned by the read endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAnnotation {
    pub id: String,
    #[serde(flatten)]
    pub payload: AnnotationPayload,
    pub created_at: DateTime<Utc>,
}

/// Body returned by a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub id: String,
}

/// Result of one persistence attempt, addressed to the comment it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Document the comment was created on
    pub document: DocumentKey,
    /// Local comment id
    pub comment_id: String,
    /// Backend id on success; `Err` carries the human-readable failure reason
    pub result: Result<String, String>,
}

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("Sync adapter requires a tokio runtime")]
    NoRuntime,
}
