//! Anchor store
//!
//! Owns the comments for one document. Every mutation is a single synchronous
//! step taken by the owner; the only asynchronous work is persistence of new
//! comments, whose outcomes come back through `apply_sync_outcome`.

use chrono::Utc;

use super::types::{Comment, Reply, SyncState};
use crate::anchor::{Anchor, SelectionDraft};
use crate::document::{Document, DocumentKey};
use crate::error::ValidationError;
use crate::session::AnnotatorSession;
use crate::sync::{PersistedAnnotation, SyncAdapter, SyncOutcome};

/// In-memory comment set for one (instance, agent) document
pub struct AnchorStore {
    document: DocumentKey,
    comments: Vec<Comment>,
    active: Option<String>,
    sync: Option<SyncAdapter>,
}

impl AnchorStore {
    /// A local-only store; new comments stay `Pending`
    pub fn new(document: DocumentKey) -> Self {
        Self {
            document,
            comments: Vec::new(),
            active: None,
            sync: None,
        }
    }

    /// Hand every new comment to this adapter
    pub fn with_sync(mut self, adapter: SyncAdapter) -> Self {
        self.sync = Some(adapter);
        self
    }

    pub fn document(&self) -> &DocumentKey {
        &self.document
    }

    /// Comments in creation order
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Create a comment on the drafted selection
    ///
    /// The comment is appended as `Pending` before persistence starts. Draft
    /// offsets are copied verbatim; the document is immutable for the session.
    pub fn create_comment(
        &mut self,
        session: &AnnotatorSession,
        draft: Option<&SelectionDraft>,
        body: &str,
    ) -> Result<Comment, ValidationError> {
        let author = session.author()?;
        let draft = draft.ok_or(ValidationError::EmptySelection)?;
        if draft.start_offset >= draft.end_offset {
            return Err(ValidationError::EmptySelection);
        }
        if body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let comment = Comment::new(draft.to_anchor(), author, body);
        tracing::debug!(
            "Created comment {} on [{}, {}) by {}",
            comment.id,
            comment.start_offset(),
            comment.end_offset(),
            author
        );
        self.comments.push(comment.clone());

        if let Some(sync) = &self.sync {
            sync.persist(&self.document, &comment);
        }

        Ok(comment)
    }

    /// Replace a comment body; local only
    pub fn edit_comment(
        &mut self,
        session: &AnnotatorSession,
        id: &str,
        new_body: &str,
    ) -> Result<&Comment, ValidationError> {
        let author = session.author()?;
        if new_body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let comment = self.owned_comment_mut(author, id)?;
        comment.body = new_body.to_string();
        comment.updated_at = Some(Utc::now());
        tracing::debug!("Edited comment {}", id);
        Ok(&*comment)
    }

    /// Remove a comment and its replies; local only
    pub fn delete_comment(
        &mut self,
        session: &AnnotatorSession,
        id: &str,
    ) -> Result<Comment, ValidationError> {
        let author = session.author()?;
        self.owned_comment_mut(author, id)?;

        let index = self
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ValidationError::CommentNotFound(id.to_string()))?;
        let removed = self.comments.remove(index);

        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        tracing::debug!("Deleted comment {}", id);
        Ok(removed)
    }

    /// Append a reply to a comment thread; local only
    pub fn add_reply(
        &mut self,
        session: &AnnotatorSession,
        comment_id: &str,
        body: &str,
    ) -> Result<Reply, ValidationError> {
        let author = session.author()?;
        if body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| ValidationError::CommentNotFound(comment_id.to_string()))?;

        let reply = Reply::new(author, body);
        comment.replies.push(reply.clone());
        Ok(reply)
    }

    /// Toggle which comment is open
    ///
    /// Selecting the active comment again clears it. Unknown ids are ignored.
    pub fn set_active(&mut self, id: Option<&str>) {
        match id {
            None => self.active = None,
            Some(id) if self.active.as_deref() == Some(id) => self.active = None,
            Some(id) if self.get(id).is_some() => self.active = Some(id.to_string()),
            Some(id) => tracing::debug!("Ignoring activation of unknown comment {}", id),
        }
    }

    /// Apply a persistence outcome
    ///
    /// Returns false when the outcome belongs to another document or the
    /// comment no longer exists.
    pub fn apply_sync_outcome(&mut self, outcome: &SyncOutcome) -> bool {
        if outcome.document != self.document {
            tracing::debug!(
                "Dropping sync outcome for {} (store holds {})",
                outcome.document,
                self.document
            );
            return false;
        }

        let Some(comment) = self.comments.iter_mut().find(|c| c.id == outcome.comment_id) else {
            tracing::debug!("Dropping sync outcome for removed comment {}", outcome.comment_id);
            return false;
        };

        match &outcome.result {
            Ok(remote_id) => comment.mark_synced(remote_id),
            Err(message) => comment.mark_failed(message),
        }
        true
    }

    /// Load previously persisted annotations as synced comments
    ///
    /// Entries that do not fit the document are skipped. Returns the number loaded.
    pub fn hydrate(&mut self, document: &Document, persisted: &[PersistedAnnotation]) -> usize {
        let mut loaded = 0;

        for annotation in persisted {
            let payload = &annotation.payload;
            if payload.instance_id != self.document.instance_id
                || payload.agent_id != self.document.agent_id
            {
                continue;
            }
            if self.comments.iter().any(|c| c.is_stored_as(&annotation.id)) {
                continue;
            }
            if !document.contains_range(payload.start_offset, payload.end_offset) {
                tracing::warn!(
                    "Skipping stored annotation {} with range [{}, {}) outside document",
                    annotation.id,
                    payload.start_offset,
                    payload.end_offset
                );
                continue;
            }

            self.comments.push(Comment {
                id: annotation.id.clone(),
                anchor: Anchor {
                    start_offset: payload.start_offset,
                    end_offset: payload.end_offset,
                    snapshot_text: payload.selection_text.clone(),
                },
                author_id: payload.annotator_id.clone(),
                body: payload.comment_text.clone(),
                created_at: annotation.created_at,
                updated_at: None,
                replies: Vec::new(),
                sync_state: SyncState::Synced,
                sync_error: None,
                remote_id: Some(annotation.id.clone()),
            });
            loaded += 1;
        }

        loaded
    }

    fn owned_comment_mut(&mut self, author: &str, id: &str) -> Result<&mut Comment, ValidationError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ValidationError::CommentNotFound(id.to_string()))?;

        if comment.author_id != author {
            return Err(ValidationError::NotAuthor(id.to_string()));
        }
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::anchor::ScreenPoint;
    use crate::sync::testing::MemorySink;
    use crate::sync::AnnotationPayload;

    fn key() -> DocumentKey {
        DocumentKey::new("inst-1", "agent-1")
    }

    fn locked(id: &str) -> AnnotatorSession {
        let mut session = AnnotatorSession::new();
        session.lock(id).unwrap();
        session
    }

    fn draft(start: usize, end: usize, text: &str) -> SelectionDraft {
        SelectionDraft {
            text: text.to_string(),
            start_offset: start,
            end_offset: end,
            screen_anchor_point: ScreenPoint::default(),
        }
    }

    #[test]
    fn test_create_comment_is_optimistic() {
        let mut store = AnchorStore::new(key());
        let comment = store
            .create_comment(&locked("alice"), Some(&draft(6, 11, "brave")), "nice adjective")
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(comment.sync_state, SyncState::Pending);
        assert_eq!(comment.author_id, "alice");
        assert_eq!(comment.anchor.snapshot_text, "brave");
    }

    #[test]
    fn test_create_comment_rejections_leave_store_unchanged() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let selection = draft(6, 11, "brave");

        assert_eq!(
            store.create_comment(&alice, Some(&selection), "").unwrap_err(),
            ValidationError::EmptyBody
        );
        assert_eq!(
            store.create_comment(&alice, Some(&selection), "   ").unwrap_err(),
            ValidationError::EmptyBody
        );
        assert_eq!(
            store.create_comment(&alice, None, "text").unwrap_err(),
            ValidationError::EmptySelection
        );
        assert_eq!(
            store
                .create_comment(&AnnotatorSession::new(), Some(&selection), "text")
                .unwrap_err(),
            ValidationError::SessionNotLocked
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_comment() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let id = store
            .create_comment(&alice, Some(&draft(0, 5, "Hello")), "first")
            .unwrap()
            .id;

        let edited = store.edit_comment(&alice, &id, "second").unwrap();
        assert_eq!(edited.body, "second");
        assert!(edited.updated_at.is_some());

        assert_eq!(
            store.edit_comment(&alice, &id, " ").unwrap_err(),
            ValidationError::EmptyBody
        );
        assert_eq!(
            store.edit_comment(&locked("bob"), &id, "hijack").unwrap_err(),
            ValidationError::NotAuthor(id.clone())
        );
        assert_eq!(store.get(&id).unwrap().body, "second");
    }

    #[test]
    fn test_delete_comment_clears_activation() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let id = store
            .create_comment(&alice, Some(&draft(0, 5, "Hello")), "first")
            .unwrap()
            .id;
        store.set_active(Some(id.as_str()));

        let removed = store.delete_comment(&alice, &id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.is_empty());
        assert_eq!(store.active(), None);
        assert_eq!(
            store.delete_comment(&alice, &id).unwrap_err(),
            ValidationError::CommentNotFound(id)
        );
    }

    #[test]
    fn test_add_reply_appends_in_order() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let bob = locked("bob");
        let id = store
            .create_comment(&alice, Some(&draft(0, 5, "Hello")), "first")
            .unwrap()
            .id;

        store.add_reply(&bob, &id, "agreed").unwrap();
        let reply = store.add_reply(&alice, &id, "thanks").unwrap();

        let replies = &store.get(&id).unwrap().replies;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].body, "agreed");
        assert_eq!(replies[0].author_id, "bob");
        assert_eq!(replies[1].id, reply.id);

        assert_eq!(
            store.add_reply(&bob, &id, "").unwrap_err(),
            ValidationError::EmptyBody
        );
        assert_eq!(
            store.add_reply(&bob, "missing", "hi").unwrap_err(),
            ValidationError::CommentNotFound("missing".into())
        );
        assert_eq!(store.get(&id).unwrap().replies.len(), 2);
    }

    #[test]
    fn test_set_active_toggles() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let a = store.create_comment(&alice, Some(&draft(0, 1, "a")), "x").unwrap().id;
        let b = store.create_comment(&alice, Some(&draft(1, 2, "b")), "y").unwrap().id;

        store.set_active(Some(a.as_str()));
        assert_eq!(store.active(), Some(a.as_str()));
        store.set_active(Some(b.as_str()));
        assert_eq!(store.active(), Some(b.as_str()));
        store.set_active(Some(b.as_str()));
        assert_eq!(store.active(), None);
        store.set_active(Some("unknown"));
        assert_eq!(store.active(), None);
    }

    #[test]
    fn test_apply_sync_outcome() {
        let mut store = AnchorStore::new(key());
        let alice = locked("alice");
        let id = store.create_comment(&alice, Some(&draft(0, 1, "a")), "x").unwrap().id;

        let failed = SyncOutcome {
            document: key(),
            comment_id: id.clone(),
            result: Err("Network error: connection refused".into()),
        };
        assert!(store.apply_sync_outcome(&failed));
        let comment = store.get(&id).unwrap();
        assert_eq!(comment.sync_state, SyncState::Failed);
        assert_eq!(comment.sync_error.as_deref(), Some("Network error: connection refused"));

        let other_doc = SyncOutcome {
            document: DocumentKey::new("inst-2", "agent-1"),
            comment_id: id.clone(),
            result: Ok("srv-1".into()),
        };
        assert!(!store.apply_sync_outcome(&other_doc));
        assert_eq!(store.get(&id).unwrap().sync_state, SyncState::Failed);

        let unknown = SyncOutcome {
            document: key(),
            comment_id: "gone".into(),
            result: Ok("srv-2".into()),
        };
        assert!(!store.apply_sync_outcome(&unknown));
    }

    #[tokio::test]
    async fn test_create_comment_hands_off_to_sync() {
        let sink = Arc::new(MemorySink::default());
        let (adapter, mut outcomes) = SyncAdapter::new(sink.clone()).unwrap();
        let mut store = AnchorStore::new(key()).with_sync(adapter);

        let id = store
            .create_comment(&locked("alice"), Some(&draft(6, 11, "brave")), "nice adjective")
            .unwrap()
            .id;
        assert_eq!(store.get(&id).unwrap().sync_state, SyncState::Pending);

        let outcome = outcomes.next().await.unwrap();
        assert!(store.apply_sync_outcome(&outcome));
        let comment = store.get(&id).unwrap();
        assert_eq!(comment.sync_state, SyncState::Synced);
        assert_eq!(comment.remote_id.as_ref(), outcome.result.as_ref().ok());

        let submitted = sink.submitted.lock().unwrap();
        assert_eq!(submitted[0].selection_text, "brave");
        assert_eq!(submitted[0].annotator_id, "alice");
    }

    #[tokio::test]
    async fn test_hydrate_skips_own_synced_comments() {
        let document = Document::new("inst-1", "agent-1", "Hello brave new world");
        let sink = Arc::new(MemorySink::default());
        let (adapter, mut outcomes) = SyncAdapter::new(sink.clone()).unwrap();
        let mut store = AnchorStore::new(key()).with_sync(adapter);

        store
            .create_comment(&locked("alice"), Some(&draft(6, 11, "brave")), "nice adjective")
            .unwrap();
        let outcome = outcomes.next().await.unwrap();
        store.apply_sync_outcome(&outcome);

        let persisted = sink.stored.lock().unwrap().clone();
        assert_eq!(persisted.len(), 1);
        assert_ne!(persisted[0].id, store.comments()[0].id);

        assert_eq!(store.hydrate(&document, &persisted), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_hydrate_skips_foreign_and_out_of_range() {
        let document = Document::new("inst-1", "agent-1", "Hello brave new world");
        let mut store = AnchorStore::new(key());

        let stored = |id: &str, instance: &str, start: usize, end: usize| PersistedAnnotation {
            id: id.to_string(),
            payload: AnnotationPayload {
                instance_id: instance.to_string(),
                agent_id: "agent-1".to_string(),
                annotator_id: "carol".to_string(),
                comment_text: "stored".to_string(),
                selection_text: document.slice(start, end.min(document.len())).unwrap_or("").to_string(),
                start_offset: start,
                end_offset: end,
            },
            created_at: Utc::now(),
        };

        let loaded = store.hydrate(
            &document,
            &[
                stored("a", "inst-1", 6, 11),
                stored("b", "inst-2", 0, 5),
                stored("c", "inst-1", 16, 40),
            ],
        );

        assert_eq!(loaded, 1);
        let comment = store.get("a").unwrap();
        assert_eq!(comment.sync_state, SyncState::Synced);
        assert_eq!(comment.anchor.snapshot_text, "brave");

        // Loading again does not duplicate
        assert_eq!(store.hydrate(&document, &[stored("a", "inst-1", 6, 11)]), 0);
    }
}
