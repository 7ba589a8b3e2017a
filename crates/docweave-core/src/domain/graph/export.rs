//! Read-only JSON export of a graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::edge::GraphEdge;
use super::model::KnowledgeGraph;
use super::node::{GraphNode, NodeKind};

/// Export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub document_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Serializable snapshot of a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: ExportMetadata,
}

impl GraphExport {
    /// Snapshot a graph; the graph itself is not touched
    pub fn from_graph(graph: &KnowledgeGraph, generated_at: DateTime<Utc>) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
            metadata: ExportMetadata {
                document_count: graph.nodes_of(NodeKind::Document).count(),
                generated_at,
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a graph, dropping malformed elements
    pub fn into_graph(self) -> KnowledgeGraph {
        KnowledgeGraph::from_parts(self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{Document, DocumentSet};
    use crate::domain::graph::GraphBuilder;
    use crate::domain::synthesis::SynthesisResult;
    use chrono::TimeZone;

    #[test]
    fn test_export_shape() {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "A", "Finance"),
            Document::new(2u64, "B", "Finance"),
        ]);
        let graph = GraphBuilder::default().build(&docs, &SynthesisResult::default());
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let json = GraphExport::from_graph(&graph, at).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["documentCount"], 2);
        assert_eq!(value["metadata"]["generatedAt"], "2024-06-01T12:00:00Z");
        assert_eq!(value["nodes"].as_array().unwrap().len(), graph.node_count());
        assert_eq!(value["edges"].as_array().unwrap().len(), graph.edge_count());

        let restored = GraphExport::from_json(&json).unwrap().into_graph();
        assert_eq!(restored.nodes(), graph.nodes());
        assert_eq!(restored.edges(), graph.edges());
    }

    #[test]
    fn test_empty_graph_export() {
        let export = GraphExport::from_graph(&KnowledgeGraph::new(), Utc::now());
        assert!(export.nodes.is_empty());
        assert!(export.edges.is_empty());
        assert_eq!(export.metadata.document_count, 0);
    }
}
