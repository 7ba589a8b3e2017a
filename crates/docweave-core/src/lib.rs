//! Docweave Core Library
//!
//! This crate provides the core functionality for Docweave, including:
//! - Relationship synthesis (insights, relationships, contradictions, timeline, gaps)
//! - Knowledge graph construction and layout
//! - Graph interaction (drag, selection, search, filters, zoom, export)
//! - Generation-counted analysis pipeline
//! - Text and terminal rendering of graph snapshots

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod visualization;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::graph::{GraphBuilder, GraphExport, KnowledgeGraph, NodeKind, Point};
    pub use crate::domain::interaction::{GraphController, InteractionEvent, RenderSnapshot};
    pub use crate::domain::synthesis::{SynthesisResult, Synthesizer};
    pub use crate::domain::{Document, DocumentId, DocumentSet};
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::{AnalysisOutcome, AnalysisPipeline, AnalysisRun, DocumentSource};
}
