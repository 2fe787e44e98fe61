//! Rendered container
//!
//! The host shows the document as a sequence of text nodes. Every highlight
//! boundary splits a node, so the node structure changes with the comment set
//! while the visible characters do not. Offsets are always measured over this
//! rendered view.

use lol_html::{doc_text, rewrite_str, RewriteStrSettings};

use crate::highlight::Run;

/// Identifies a rendered region in the host (the transcript pane, a sidebar, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u32);

/// Text nodes currently rendered inside one container
#[derive(Debug, Clone)]
pub struct RenderedContainer {
    id: ContainerId,
    nodes: Vec<String>,
}

/// Errors while reading rendered markup
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("HTML rewrite failed: {0}")]
    RewriteError(String),
}

impl RenderedContainer {
    /// Build a container from explicit text nodes
    pub fn new(id: ContainerId, nodes: Vec<String>) -> Self {
        Self { id, nodes }
    }

    /// One text node per compositor run
    pub fn from_runs(id: ContainerId, runs: &[Run]) -> Self {
        Self {
            id,
            nodes: runs
                .iter()
                .filter(|run| !run.text.is_empty())
                .map(|run| run.text.clone())
                .collect(),
        }
    }

    /// Parse rendered markup into its text nodes
    ///
    /// Entities are decoded so node lengths match what the reader sees.
    pub fn from_html(id: ContainerId, html: &str) -> Result<Self, ContainerError> {
        let mut nodes = Vec::new();
        let mut current = String::new();

        rewrite_str(
            html,
            RewriteStrSettings {
                document_content_handlers: vec![doc_text!(|t| {
                    current.push_str(t.as_str());
                    if t.last_in_text_node() {
                        let decoded = html_escape::decode_html_entities(&current).into_owned();
                        if !decoded.is_empty() {
                            nodes.push(decoded);
                        }
                        current.clear();
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|e| ContainerError::RewriteError(e.to_string()))?;

        Ok(Self { id, nodes })
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Char length of one node
    pub fn node_len(&self, node: usize) -> Option<usize> {
        self.nodes.get(node).map(|n| n.chars().count())
    }

    /// Char length of all nodes before `node`
    pub fn prefix_len(&self, node: usize) -> usize {
        self.nodes
            .iter()
            .take(node)
            .map(|n| n.chars().count())
            .sum()
    }

    /// Total rendered char length
    pub fn text_len(&self) -> usize {
        self.prefix_len(self.nodes.len())
    }

    /// Concatenated rendered text
    pub fn text(&self) -> String {
        self.nodes.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANE: ContainerId = ContainerId(1);

    #[test]
    fn test_from_html_splits_at_spans() {
        let html = r#"Hello <span class="highlight" data-comment-id="c1">brave</span> new world"#;
        let container = RenderedContainer::from_html(PANE, html).unwrap();

        assert_eq!(container.nodes(), &["Hello ", "brave", " new world"]);
        assert_eq!(container.text(), "Hello brave new world");
        assert_eq!(container.prefix_len(2), 11);
    }

    #[test]
    fn test_from_html_decodes_entities() {
        let html = "a &lt;b&gt; &amp; c";
        let container = RenderedContainer::from_html(PANE, html).unwrap();

        assert_eq!(container.text(), "a <b> & c");
        assert_eq!(container.text_len(), 9);
    }

    #[test]
    fn test_from_html_plain_text() {
        let container = RenderedContainer::from_html(PANE, "no markup at all").unwrap();
        assert_eq!(container.nodes().len(), 1);
        assert_eq!(container.node_len(0), Some(16));
        assert_eq!(container.node_len(1), None);
    }

    #[test]
    fn test_from_runs_skips_empty_runs() {
        let runs = vec![Run::plain(""), Run::plain("abc")];
        let container = RenderedContainer::from_runs(PANE, &runs);
        assert_eq!(container.nodes(), &["abc"]);
    }
}
