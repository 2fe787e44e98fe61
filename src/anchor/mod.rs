//! Anchoring module
//!
//! Turns ephemeral host selections into stable offset anchors.
//!
//! - `Anchor`: `[start, end)` char range plus a text snapshot
//! - `SelectionDraft`: a resolved selection awaiting a comment
//! - `RenderedContainer`: text nodes currently on screen
//! - `resolve`: prefix-length offset resolution over the rendered nodes

mod container;
mod resolver;
mod types;

pub use container::{ContainerError, ContainerId, RenderedContainer};
pub use resolver::{resolve, RawSelection, SelectionPoint};
pub use types::{Anchor, ScreenPoint, SelectionDraft};
