//! Domain layer
//!
//! - `document`: analyzed input records
//! - `synthesis`: insights, relationships, contradictions, timeline and gaps
//! - `graph`: typed node/edge graph with deterministic layout
//! - `interaction`: view state and the drag/selection state machine

pub mod document;
pub mod graph;
pub mod interaction;
pub mod synthesis;

pub use document::{Document, DocumentId, DocumentSet};
