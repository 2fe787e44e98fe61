//! Highlight module
//!
//! - `composite`: split a document into plain and highlighted runs
//! - `render_html`: turn runs into markup for the presentation shell

mod compositor;
mod render;

pub use compositor::{composite, Run};
pub use render::{render_html, HighlightConfig};
