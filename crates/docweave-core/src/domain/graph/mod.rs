//! Knowledge graph model
//!
//! Projects documents and their synthesis into typed nodes and edges:
//!
//! - **document**: one per input document, laid out on a grid
//! - **concept**: keywords and categories shared by two or more documents
//! - **entity**: people, organizations and places from a fixed catalog
//! - **timeline**: one per dated document, in a vertical lane
//! - **insight**: the leading synthesized insights
//!
//! No two edges connect the same unordered node pair.

mod builder;
mod catalog;
mod edge;
mod export;
mod geometry;
mod model;
mod node;

pub use builder::{GraphBuilder, document_node_id};
pub use catalog::{CatalogEntity, EntityKind, entity_catalog};
pub use edge::{EdgeKey, EdgeStyle, GraphEdge};
pub use export::{ExportMetadata, GraphExport};
pub use geometry::{CanvasBounds, DEFAULT_CANVAS_MARGIN, Point};
pub use model::{EdgeRejection, KnowledgeGraph};
pub use node::{GraphNode, NodeKind, NodePayload};
