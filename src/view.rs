//! Annotation view
//!
//! The per-document context a presentation shell talks to. It owns the
//! document, its comments, the annotator session and the current selection
//! draft, and exposes only what the shell needs to draw: runs, the comment
//! list and the draft.
//!
//! A view is torn down and rebuilt whenever the (instance, agent) pair
//! changes; see `switch_document`.

use std::sync::Arc;

use crate::anchor::{resolve, ContainerId, RawSelection, RenderedContainer, SelectionDraft};
use crate::annotations::{AnchorStore, Comment, Reply};
use crate::document::Document;
use crate::error::ValidationError;
use crate::highlight::{self, composite, HighlightConfig, Run};
use crate::session::AnnotatorSession;
use crate::sync::{AnnotationSink, SyncAdapter, SyncError, SyncOutcome, SyncOutcomes};

/// Container id of the transcript pane
pub const TRANSCRIPT_PANE: ContainerId = ContainerId(0);

pub struct AnnotationView {
    document: Document,
    store: AnchorStore,
    session: AnnotatorSession,
    draft: Option<SelectionDraft>,
    adapter: Option<SyncAdapter>,
    outcomes: Option<SyncOutcomes>,
}

impl AnnotationView {
    /// A view whose comments are never persisted
    pub fn new(document: Document) -> Self {
        let store = AnchorStore::new(document.key().clone());
        Self {
            document,
            store,
            session: AnnotatorSession::new(),
            draft: None,
            adapter: None,
            outcomes: None,
        }
    }

    /// A view that persists new comments to `sink`
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(document: Document, sink: Arc<dyn AnnotationSink>) -> Result<Self, SyncError> {
        let (adapter, outcomes) = SyncAdapter::new(sink)?;
        let store = AnchorStore::new(document.key().clone()).with_sync(adapter.clone());
        Ok(Self {
            document,
            store,
            session: AnnotatorSession::new(),
            draft: None,
            adapter: Some(adapter),
            outcomes: Some(outcomes),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn session(&self) -> &AnnotatorSession {
        &self.session
    }

    pub fn lock_annotator(&mut self, annotator_id: &str) -> Result<(), ValidationError> {
        self.session.lock(annotator_id).map(|_| ())
    }

    /// Resolve a raw selection into the current draft
    ///
    /// A selection that does not resolve (collapsed, outside the pane, or not
    /// matching the document text) clears the draft, like a click elsewhere.
    pub fn select(
        &mut self,
        raw: &RawSelection,
        container: &RenderedContainer,
    ) -> Option<&SelectionDraft> {
        self.draft = resolve(raw, container).filter(|draft| {
            let matches = self.document.slice(draft.start_offset, draft.end_offset)
                == Some(draft.text.as_str());
            if !matches {
                tracing::debug!(
                    "Selection [{}, {}) does not match document text",
                    draft.start_offset,
                    draft.end_offset
                );
            }
            matches
        });
        self.draft.as_ref()
    }

    pub fn dismiss_draft(&mut self) {
        self.draft = None;
    }

    /// Create a comment on the current draft
    ///
    /// The draft is discarded only when the comment is created.
    pub fn submit_comment(&mut self, body: &str) -> Result<Comment, ValidationError> {
        let comment = self
            .store
            .create_comment(&self.session, self.draft.as_ref(), body)?;
        self.draft = None;
        Ok(comment)
    }

    pub fn edit_comment(&mut self, id: &str, body: &str) -> Result<&Comment, ValidationError> {
        self.store.edit_comment(&self.session, id, body)
    }

    pub fn delete_comment(&mut self, id: &str) -> Result<Comment, ValidationError> {
        self.store.delete_comment(&self.session, id)
    }

    pub fn reply(&mut self, comment_id: &str, body: &str) -> Result<Reply, ValidationError> {
        self.store.add_reply(&self.session, comment_id, body)
    }

    /// Open a comment, or close it if it is already open
    pub fn toggle_active(&mut self, id: &str) {
        self.store.set_active(Some(id));
    }

    pub fn active(&self) -> Option<&str> {
        self.store.active()
    }

    /// Current highlight runs
    pub fn runs(&self) -> Vec<Run> {
        composite(&self.document, self.store.comments(), self.store.active())
    }

    pub fn render_html(&self, config: &HighlightConfig) -> String {
        highlight::render_html(&self.runs(), config)
    }

    /// The text nodes the transcript pane shows for the current runs
    pub fn rendered_container(&self) -> RenderedContainer {
        RenderedContainer::from_runs(TRANSCRIPT_PANE, &self.runs())
    }

    pub fn comments(&self) -> &[Comment] {
        self.store.comments()
    }

    pub fn draft(&self) -> Option<&SelectionDraft> {
        self.draft.as_ref()
    }

    /// Apply every persistence outcome that has already arrived
    ///
    /// Returns the number applied to this document.
    pub fn apply_sync_outcomes(&mut self) -> usize {
        let Some(outcomes) = self.outcomes.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        while let Some(outcome) = outcomes.try_next() {
            if self.store.apply_sync_outcome(&outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next persistence outcome and apply it
    ///
    /// Returns `None` for a local-only view.
    pub async fn next_sync_outcome(&mut self) -> Option<SyncOutcome> {
        let outcome = self.outcomes.as_mut()?.next().await?;
        self.store.apply_sync_outcome(&outcome);
        Some(outcome)
    }

    /// Load comments already persisted for this document
    pub async fn load_persisted(&mut self) -> Result<usize, SyncError> {
        let Some(adapter) = &self.adapter else {
            return Ok(0);
        };

        let persisted = adapter.fetch(self.document.key()).await?;
        let loaded = self.store.hydrate(&self.document, &persisted);
        tracing::info!("Loaded {} stored comments for {}", loaded, self.document.key());
        Ok(loaded)
    }

    /// Replace the document and drop every comment and the draft
    ///
    /// Outcomes still in flight for the old document are ignored when they arrive.
    pub fn switch_document(&mut self, document: Document, keep_session: bool) {
        tracing::info!("Switching document {} -> {}", self.document.key(), document.key());

        let mut store = AnchorStore::new(document.key().clone());
        if let Some(adapter) = &self.adapter {
            store = store.with_sync(adapter.clone());
        }

        self.store = store;
        self.document = document;
        self.draft = None;
        if !keep_session {
            self.session.reset();
        }
    }
}
