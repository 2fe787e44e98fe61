//! Document types
//!
//! A document is the full transcript for one (instance, agent) pair. It is
//! loaded once per view and never mutated; every anchor lives in its
//! coordinate system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the transcript a document was loaded for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
    #[serde(rename = "agentId")]
    pub agent_id: String,
}

impl DocumentKey {
    pub fn new(instance_id: &str, agent_id: &str) -> Self {
        Self {
            instance_id: instance_id.to_string(),
            agent_id: agent_id.to_string(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.instance_id, self.agent_id)
    }
}

/// Immutable transcript text
///
/// Offsets are counted in `char`s (Unicode scalar values), end-exclusive.
/// Byte boundaries are computed once at load so slicing is constant time.
///
/// Browser hosts report selection lengths in UTF-16 code units, where a
/// character outside the Basic Multilingual Plane (most emoji) counts as two.
/// Such hosts must convert to char counts before building a selection.
#[derive(Debug, Clone)]
pub struct Document {
    key: DocumentKey,
    text: String,
    /// Byte index of every char, plus a trailing entry for `text.len()`
    boundaries: Vec<usize>,
}

impl Document {
    /// Load a document for the given instance and agent
    pub fn new(instance_id: &str, agent_id: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());

        Self {
            key: DocumentKey::new(instance_id, agent_id),
            text,
            boundaries,
        }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether `[start, end)` is a non-empty range inside the document
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        start < end && end <= self.len()
    }

    /// Slice by char offsets, `None` when the range is not inside the document
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.len() {
            return None;
        }
        Some(&self.text[self.boundaries[start]..self.boundaries[end]])
    }
}
