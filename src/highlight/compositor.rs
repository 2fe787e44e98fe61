//! Highlight compositor
//!
//! Splits the document into a gap-free sequence of plain and highlighted runs.
//!
//! Comments are ordered by start offset. The first comment to start owns the
//! text up to its end; a later comment that overlaps it is truncated to begin
//! where the previous highlight ended, and one that lies entirely inside an
//! earlier highlight is not drawn.

use serde::Serialize;

use crate::annotations::{Comment, SyncState};
use crate::document::Document;

/// A contiguous slice of the document tagged with at most one comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    #[serde(rename = "commentId")]
    pub comment_id: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "syncState", skip_serializing_if = "Option::is_none")]
    pub sync_state: Option<SyncState>,
}

impl Run {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            comment_id: None,
            is_active: false,
            sync_state: None,
        }
    }

    fn highlighted(text: &str, comment: &Comment, active: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            comment_id: Some(comment.id.clone()),
            is_active: active == Some(comment.id.as_str()),
            sync_state: Some(comment.sync_state),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.comment_id.is_some()
    }
}

/// Composite the comment set over the document
///
/// Pure: identical inputs always yield identical runs. Anchors that do not fit
/// the document are skipped.
pub fn composite(document: &Document, comments: &[Comment], active: Option<&str>) -> Vec<Run> {
    let mut ordered: Vec<&Comment> = comments
        .iter()
        .filter(|c| {
            let fits = c.anchor.fits(document);
            if !fits {
                tracing::warn!(
                    "Skipping comment {} with unrenderable range [{}, {})",
                    c.id,
                    c.start_offset(),
                    c.end_offset()
                );
            }
            fits
        })
        .collect();
    // Stable: equal starts keep store order
    ordered.sort_by_key(|c| c.start_offset());

    let mut runs = Vec::new();
    let mut cursor = 0;

    for comment in ordered {
        let end = comment.end_offset();
        if end <= cursor {
            continue;
        }
        let start = comment.start_offset().max(cursor);

        if start > cursor {
            if let Some(text) = document.slice(cursor, start) {
                runs.push(Run::plain(text));
            }
        }
        if let Some(text) = document.slice(start, end) {
            runs.push(Run::highlighted(text, comment, active));
        }
        cursor = end;
    }

    if cursor < document.len() || runs.is_empty() {
        if let Some(text) = document.slice(cursor, document.len()) {
            runs.push(Run::plain(text));
        }
    }

    runs
}
