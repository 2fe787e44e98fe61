//! Offset resolver
//!
//! Maps a host text selection to `[start, end)` char offsets in the document.
//!
//! The start offset is the rendered length of a pre-selection range spanning
//! from the container start to the selection start. Highlight markup splits
//! text nodes but never changes the visible character count, so the result is
//! the same whether zero or many highlights are currently drawn.

use super::container::{ContainerId, RenderedContainer};
use super::types::{ScreenPoint, SelectionDraft};

/// A position inside a rendered text node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    /// Container the node belongs to
    pub container: ContainerId,
    /// Index of the text node within its container
    pub node: usize,
    /// Char offset inside the node
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(container: ContainerId, node: usize, offset: usize) -> Self {
        Self {
            container,
            node,
            offset,
        }
    }
}

/// The selection primitive as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct RawSelection {
    /// Where the selection gesture started
    pub anchor: SelectionPoint,
    /// Where the selection gesture ended
    pub focus: SelectionPoint,
    /// The selected text as the host reports it
    pub text: String,
    /// Screen position for the floating "add comment" affordance
    pub screen_point: ScreenPoint,
}

impl RawSelection {
    /// Whether anchor and focus coincide
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Resolve a host selection against the rendered document container
///
/// Returns `None` for empty or collapsed selections, selections anchored
/// outside `root`, and points that do not exist in the rendered nodes.
pub fn resolve(selection: &RawSelection, root: &RenderedContainer) -> Option<SelectionDraft> {
    if selection.text.is_empty() || selection.is_collapsed() {
        return None;
    }
    if selection.anchor.container != root.id() {
        tracing::debug!("Selection anchored outside the document container");
        return None;
    }

    // Backward selections start at the focus
    let start = if selection.focus.container == root.id()
        && (selection.focus.node, selection.focus.offset)
            < (selection.anchor.node, selection.anchor.offset)
    {
        selection.focus
    } else {
        selection.anchor
    };

    let node_len = root.node_len(start.node)?;
    if start.offset > node_len {
        return None;
    }

    let start_offset = root.prefix_len(start.node) + start.offset;
    let end_offset = start_offset + selection.text.chars().count();
    if end_offset > root.text_len() {
        tracing::debug!(
            "Selection end {} exceeds rendered length {}",
            end_offset,
            root.text_len()
        );
        return None;
    }

    Some(SelectionDraft {
        text: selection.text.clone(),
        start_offset,
        end_offset,
        screen_anchor_point: selection.screen_point,
    })
}
