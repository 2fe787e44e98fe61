//! Comment and reply types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::Anchor;

/// Persistence status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Shown locally, submission in flight
    Pending,
    /// Confirmed by the backend
    Synced,
    /// Submission failed; kept visible, never retried
    Failed,
}

/// A comment anchored to a span of the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier (UUID)
    pub id: String,
    /// The span being commented on
    pub anchor: Anchor,
    /// Annotator who wrote the comment
    #[serde(rename = "authorId")]
    pub author_id: String,
    /// Comment text
    pub body: String,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last local edit
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Threaded replies in insertion order
    pub replies: Vec<Reply>,
    /// Persistence status
    #[serde(rename = "syncState")]
    pub sync_state: SyncState,
    /// Human-readable reason when `sync_state` is `Failed`
    #[serde(rename = "syncError", skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,
    /// Id assigned by the backend once synced
    #[serde(rename = "remoteId", default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

/// A reply in a comment thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new, not yet persisted comment
    pub fn new(anchor: Anchor, author_id: &str, body: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            anchor,
            author_id: author_id.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
            updated_at: None,
            replies: Vec::new(),
            sync_state: SyncState::Pending,
            sync_error: None,
            remote_id: None,
        }
    }

    pub fn start_offset(&self) -> usize {
        self.anchor.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.anchor.end_offset
    }

    pub fn mark_synced(&mut self, remote_id: &str) {
        self.sync_state = SyncState::Synced;
        self.sync_error = None;
        self.remote_id = Some(remote_id.to_string());
    }

    /// Whether this comment is the local copy of a stored annotation
    pub fn is_stored_as(&self, stored_id: &str) -> bool {
        self.id == stored_id || self.remote_id.as_deref() == Some(stored_id)
    }

    pub fn mark_failed(&mut self, message: &str) {
        self.sync_state = SyncState::Failed;
        self.sync_error = Some(message.to_string());
    }
}

impl Reply {
    pub fn new(author_id: &str, body: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> Anchor {
        Anchor {
            start_offset: 6,
            end_offset: 11,
            snapshot_text: "brave".into(),
        }
    }

    #[test]
    fn test_new_comment_is_pending() {
        let comment = Comment::new(anchor(), "alice", "nice adjective");
        assert_eq!(comment.sync_state, SyncState::Pending);
        assert!(comment.sync_error.is_none());
        assert!(comment.replies.is_empty());
        assert_eq!(comment.start_offset(), 6);
        assert_eq!(comment.end_offset(), 11);
    }

    #[test]
    fn test_sync_transitions() {
        let mut comment = Comment::new(anchor(), "alice", "nice adjective");
        comment.mark_failed("server returned 500");
        assert_eq!(comment.sync_state, SyncState::Failed);
        assert_eq!(comment.sync_error.as_deref(), Some("server returned 500"));

        comment.mark_synced("srv-1");
        assert_eq!(comment.sync_state, SyncState::Synced);
        assert!(comment.sync_error.is_none());
        assert!(comment.is_stored_as("srv-1"));
        assert!(comment.is_stored_as(&comment.id.clone()));
        assert!(!comment.is_stored_as("srv-2"));
    }

    #[test]
    fn test_unique_ids() {
        let a = Comment::new(anchor(), "alice", "one");
        let b = Comment::new(anchor(), "alice", "one");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialization() {
        let mut comment = Comment::new(anchor(), "alice", "nice adjective");
        comment.replies.push(Reply::new("bob", "agreed"));

        let json = serde_json::to_string_pretty(&comment).unwrap();
        assert!(json.contains("\"syncState\": \"pending\""));
        assert!(json.contains("\"authorId\": \"alice\""));
        assert!(!json.contains("syncError"));

        let parsed: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.replies.len(), 1);
        assert_eq!(parsed.anchor, comment.anchor);
    }
}
