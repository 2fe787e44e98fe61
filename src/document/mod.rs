//! Document module
//!
//! The immutable transcript text all anchors are expressed against.

mod types;

pub use types::{Document, DocumentKey};
