//! Annotation module
//!
//! Comments anchored to transcript spans, with threaded replies.
//!
//! - `Comment` / `Reply`: the annotation records
//! - `SyncState`: optimistic persistence status (`Pending`, `Synced`, `Failed`)
//! - `AnchorStore`: the single owner of a document's comments

mod store;
mod types;

pub use store::AnchorStore;
pub use types::{Comment, Reply, SyncState};
