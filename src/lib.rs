//! Transcript Annotator
//!
//! Anchors human comments to character ranges of agent interaction
//! transcripts, composites overlapping highlights into renderable runs, and
//! persists new comments optimistically to an annotation backend.
//!
//! # Modules
//!
//! - `document`: immutable transcript text addressed by (instance, agent)
//! - `anchor`: offset resolution from rendered selections
//! - `annotations`: comments, replies and the per-document anchor store
//! - `highlight`: run compositing and HTML rendering
//! - `session`: annotator identity gate
//! - `sync`: background persistence of new comments
//! - `view`: the per-document context a presentation shell drives
//! - `db`, `routes`, `state`: the reference annotation backend

pub mod anchor;
pub mod annotations;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod highlight;
pub mod routes;
pub mod session;
pub mod state;
pub mod sync;
pub mod view;

pub use view::AnnotationView;
