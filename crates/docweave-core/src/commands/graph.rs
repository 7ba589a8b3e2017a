//! Knowledge graph commands
//!
//! Loading, statistics and text rendering used by the CLI and TUI.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::Config;
use crate::domain::graph::{EdgeStyle, KnowledgeGraph, NodeKind, NodePayload};
use crate::domain::interaction::{GraphController, InteractionEvent, RenderSnapshot};
use crate::error::Result;
use crate::pipeline::{AnalysisOutcome, AnalysisPipeline, DocumentSource, JsonFileSource};
use crate::visualization::{GraphOutline, OutlineOptions};

/// Statistics about a knowledge graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub edges_by_style: BTreeMap<EdgeStyle, usize>,
    /// Mean confidence of document nodes (0 to 100)
    pub average_confidence: f64,
    /// Nodes without any edge
    pub isolated_nodes: usize,
}

/// Read documents from a JSON file and analyze them
pub async fn analyze_file(config: &Config, path: &Path) -> Result<AnalysisOutcome> {
    let documents = JsonFileSource::new(path).fetch_documents().await?;
    Ok(AnalysisPipeline::new(config).analyze_now(documents))
}

/// Get graph statistics
pub fn get_stats(graph: &KnowledgeGraph) -> GraphStatistics {
    let mut nodes_by_kind: BTreeMap<NodeKind, usize> = BTreeMap::new();
    let mut total_confidence = 0.0;
    let mut documents = 0usize;

    for node in graph.nodes() {
        *nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        if let NodePayload::Document { confidence, .. } = &node.payload {
            total_confidence += confidence;
            documents += 1;
        }
    }

    let average_confidence = if documents > 0 {
        total_confidence / documents as f64
    } else {
        0.0
    };

    let mut edges_by_style: BTreeMap<EdgeStyle, usize> = BTreeMap::new();
    let mut connected: BTreeSet<&str> = BTreeSet::new();
    for edge in graph.edges() {
        *edges_by_style.entry(edge.style).or_insert(0) += 1;
        connected.insert(&edge.source_node_id);
        connected.insert(&edge.target_node_id);
    }

    let isolated_nodes = graph
        .nodes()
        .iter()
        .filter(|n| !connected.contains(n.id.as_str()))
        .count();

    GraphStatistics {
        total_nodes: graph.node_count(),
        total_edges: graph.edge_count(),
        nodes_by_kind,
        edges_by_style,
        average_confidence,
        isolated_nodes,
    }
}

/// Format graph statistics for display
pub fn format_stats(stats: &GraphStatistics) -> String {
    let mut output = String::new();

    output.push_str("Knowledge Graph Statistics\n");
    output.push_str("==========================\n\n");

    output.push_str(&format!("Total Nodes:         {}\n", stats.total_nodes));
    output.push_str(&format!("Total Edges:         {}\n", stats.total_edges));
    output.push_str(&format!("Isolated Nodes:      {}\n", stats.isolated_nodes));
    output.push_str(&format!(
        "Average Confidence:  {:.1}%\n\n",
        stats.average_confidence
    ));

    if !stats.nodes_by_kind.is_empty() {
        output.push_str("Nodes by Kind:\n");
        let mut sorted: Vec<_> = stats.nodes_by_kind.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in sorted {
            output.push_str(&format!("  {:20} {}\n", kind.as_str(), count));
        }
        output.push('\n');
    }

    if !stats.edges_by_style.is_empty() {
        output.push_str("Edges by Style:\n");
        let mut sorted: Vec<_> = stats.edges_by_style.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));
        for (style, count) in sorted {
            output.push_str(&format!("  {:20} {}\n", style.as_str(), count));
        }
    }

    output
}

/// View options for a rendered graph
#[derive(Debug, Clone, Default)]
pub struct GraphQuery {
    pub search: Option<String>,
    /// Kinds to show; empty shows all
    pub kinds: Vec<NodeKind>,
    pub ascii: bool,
    pub show_positions: bool,
}

/// Snapshot a graph under a search and kind filter
pub fn query_graph(graph: KnowledgeGraph, config: &Config, query: &GraphQuery) -> RenderSnapshot {
    let mut controller = GraphController::with_graph(graph, config.canvas.bounds());

    if !query.kinds.is_empty() {
        controller.apply(&InteractionEvent::SetTypeFilters {
            kinds: query.kinds.iter().copied().collect(),
        });
    }
    match &query.search {
        Some(term) => controller.search(term.clone()),
        None => controller.snapshot(),
    }
}

/// Render a graph as a text outline under a search and kind filter
pub fn format_graph(graph: KnowledgeGraph, config: &Config, query: &GraphQuery) -> String {
    let snapshot = query_graph(graph, config, query);

    let options = if query.ascii {
        OutlineOptions::ascii()
    } else {
        OutlineOptions::default()
    }
    .with_positions(query.show_positions);

    GraphOutline::with_options(&snapshot, options).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{Document, DocumentSet};

    fn outcome() -> AnalysisOutcome {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "Budget", "Finance").with_confidence(80.0),
            Document::new(2u64, "Forecast", "Finance").with_confidence(60.0),
            Document::new(3u64, "Plan", "Strategy").with_confidence(100.0),
        ]);
        AnalysisPipeline::default().analyze_now(docs)
    }

    #[test]
    fn test_get_stats() {
        let stats = get_stats(&outcome().graph);
        assert_eq!(stats.nodes_by_kind[&NodeKind::Document], 3);
        assert_eq!(stats.nodes_by_kind[&NodeKind::Entity], 3);
        assert!((stats.average_confidence - 80.0).abs() < 1e-9);
        assert_eq!(stats.total_edges, stats.edges_by_style.values().sum::<usize>());
    }

    #[test]
    fn test_format_stats() {
        let stats = GraphStatistics {
            total_nodes: 12,
            total_edges: 20,
            nodes_by_kind: BTreeMap::from([(NodeKind::Document, 5), (NodeKind::Concept, 7)]),
            edges_by_style: BTreeMap::from([(EdgeStyle::Solid, 15), (EdgeStyle::Dotted, 5)]),
            average_confidence: 78.0,
            isolated_nodes: 1,
        };

        let output = format_stats(&stats);
        assert!(output.contains("Total Nodes:"));
        assert!(output.contains("12"));
        assert!(output.contains("78.0%"));
        let concept = output.find("concept").unwrap();
        let document = output.find("document").unwrap();
        assert!(concept < document);
    }

    #[test]
    fn test_format_graph_filters_kinds() {
        let query = GraphQuery {
            kinds: vec![NodeKind::Document],
            ascii: true,
            ..Default::default()
        };
        let text = format_graph(outcome().graph, &Config::default(), &query);
        assert!(text.contains("[D] Budget"));
        assert!(!text.contains("[C] Finance"));
        assert!(!text.contains("[E] Sarah Chen"));
    }

    #[test]
    fn test_query_graph_search() {
        let query = GraphQuery {
            search: Some("plan".to_string()),
            ..Default::default()
        };
        let snapshot = query_graph(outcome().graph, &Config::default(), &query);
        assert!(snapshot.nodes.iter().any(|n| n.id == "doc:3"));
        assert!(snapshot.nodes.iter().all(|n| n.matches("plan")));
        assert_eq!(snapshot.search_matches.len(), snapshot.nodes.len());
    }

    #[tokio::test]
    async fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "[]").unwrap();

        let outcome = analyze_file(&Config::default(), &path).await.unwrap();
        assert!(outcome.graph.is_empty());

        std::fs::write(&path, "null").unwrap();
        let err = analyze_file(&Config::default(), &path).await.unwrap_err();
        assert_eq!(err.code(), "E100");
    }
}
