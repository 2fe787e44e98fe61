//! Anchor and selection draft types

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A stable offset range into a document
///
/// `snapshot_text` is the document text at creation time and is kept for
/// display regardless of later rendering changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(rename = "startOffset")]
    pub start_offset: usize,
    #[serde(rename = "endOffset")]
    pub end_offset: usize,
    #[serde(rename = "snapshotText")]
    pub snapshot_text: String,
}

impl Anchor {
    /// Build an anchor by slicing the document, `None` for empty or out-of-range spans
    pub fn from_document(document: &Document, start: usize, end: usize) -> Option<Self> {
        if !document.contains_range(start, end) {
            return None;
        }
        document.slice(start, end).map(|text| Self {
            start_offset: start,
            end_offset: end,
            snapshot_text: text.to_string(),
        })
    }

    /// Whether the anchor can be drawn over this document
    pub fn fits(&self, document: &Document) -> bool {
        document.contains_range(self.start_offset, self.end_offset)
    }

    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Point in host screen coordinates where the "add comment" affordance floats
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// An ephemeral, resolved text selection awaiting a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDraft {
    pub text: String,
    #[serde(rename = "startOffset")]
    pub start_offset: usize,
    #[serde(rename = "endOffset")]
    pub end_offset: usize,
    #[serde(rename = "screenAnchorPoint")]
    pub screen_anchor_point: ScreenPoint,
}

impl SelectionDraft {
    /// Copy the draft offsets verbatim into an anchor
    pub fn to_anchor(&self) -> Anchor {
        Anchor {
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            snapshot_text: self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_snapshot_matches_document() {
        let doc = Document::new("inst-1", "agent-1", "Hello brave new world");
        let anchor = Anchor::from_document(&doc, 6, 11).unwrap();
        assert_eq!(anchor.snapshot_text, "brave");
        assert_eq!(doc.slice(anchor.start_offset, anchor.end_offset).unwrap(), anchor.snapshot_text);
        assert!(anchor.fits(&doc));
    }

    #[test]
    fn test_anchor_rejects_bad_ranges() {
        let doc = Document::new("inst-1", "agent-1", "short");
        assert!(Anchor::from_document(&doc, 2, 2).is_none());
        assert!(Anchor::from_document(&doc, 3, 9).is_none());
    }

    #[test]
    fn test_draft_to_anchor_copies_offsets() {
        let draft = SelectionDraft {
            text: "brave".into(),
            start_offset: 6,
            end_offset: 11,
            screen_anchor_point: ScreenPoint { x: 10.0, y: 20.0 },
        };
        let anchor = draft.to_anchor();
        assert_eq!(anchor.start_offset, 6);
        assert_eq!(anchor.end_offset, 11);
        assert_eq!(anchor.snapshot_text, "brave");
    }

    #[test]
    fn test_anchor_serialization() {
        let anchor = Anchor {
            start_offset: 1,
            end_offset: 4,
            snapshot_text: "abc".into(),
        };
        let json = serde_json::to_string(&anchor).unwrap();
        assert!(json.contains("startOffset"));
        assert!(json.contains("snapshotText"));
    }
}
