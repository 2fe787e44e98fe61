//! Sync module
//!
//! Optimistic persistence of new comments.
//!
//! # Protocol
//!
//! 1. The anchor store appends a `Pending` comment and calls `SyncAdapter::persist`
//! 2. A background task submits an `AnnotationPayload` to the `AnnotationSink`
//! 3. The task sends a `SyncOutcome` to the owner of the store
//! 4. The owner applies it: `Synced`, or `Failed` with the error message
//!
//! Failed comments are never rolled back or retried. Edits, deletions and
//! replies are local only.

mod adapter;
mod types;

#[cfg(test)]
pub(crate) use adapter::testing;
pub use adapter::{AnnotationSink, HttpSink, SyncAdapter, SyncOutcomes};
pub use types::{AnnotationPayload, PersistedAnnotation, SubmitResponse, SyncError, SyncOutcome};
