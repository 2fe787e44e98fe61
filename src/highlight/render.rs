//! Highlight renderer
//!
//! Turns compositor runs into markup the presentation shell can display.
//! Plain runs become escaped text; highlighted runs become spans carrying the
//! comment id, the active flag and the sync state.

use crate::annotations::SyncState;

use super::compositor::Run;

/// Configuration for highlight markup
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// CSS class prefix for highlights
    pub class_prefix: String,
    /// Data attribute for the comment ID
    pub id_attribute: String,
    /// Whether to include inline styles
    pub include_inline_styles: bool,
    /// Background color of an inactive highlight
    pub color: String,
    /// Background color of the active highlight
    pub active_color: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class_prefix: "ta-highlight".to_string(),
            id_attribute: "data-comment-id".to_string(),
            include_inline_styles: false,
            color: "#fff3a0".to_string(),
            active_color: "#ffd54f".to_string(),
        }
    }
}

/// Render runs as HTML
///
/// The text content of the output is exactly the concatenated run text.
pub fn render_html(runs: &[Run], config: &HighlightConfig) -> String {
    let mut html = String::new();
    for run in runs {
        let text = html_escape::encode_text(&run.text);
        match run.comment_id.as_deref() {
            Some(id) => html.push_str(&format_highlight_span(run, id, &text, config)),
            None => html.push_str(&text),
        }
    }
    html
}

fn format_highlight_span(run: &Run, id: &str, text: &str, config: &HighlightConfig) -> String {
    let mut class = config.class_prefix.clone();
    if run.is_active {
        class.push_str(&format!(" {}-active", config.class_prefix));
    }
    match run.sync_state {
        Some(SyncState::Pending) => class.push_str(&format!(" {}-pending", config.class_prefix)),
        Some(SyncState::Failed) => class.push_str(&format!(" {}-failed", config.class_prefix)),
        Some(SyncState::Synced) | None => {}
    }

    let style = if config.include_inline_styles {
        let color = if run.is_active {
            &config.active_color
        } else {
            &config.color
        };
        format!(" style=\"background-color: {};\"", color)
    } else {
        String::new()
    };

    format!(
        "<span class=\"{}\" {}=\"{}\"{}>{}</span>",
        class,
        config.id_attribute,
        html_escape::encode_double_quoted_attribute(id),
        style,
        text
    )
}
