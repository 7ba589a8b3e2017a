//! Arena-backed knowledge graph
//!
//! Nodes live in a single vector indexed by id. Edges are kept unique per
//! unordered node pair and may only connect nodes that exist.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::warn;

use super::edge::{EdgeKey, GraphEdge};
use super::geometry::Point;
use super::node::{GraphNode, NodeKind};

/// Why an edge was not added
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    /// An endpoint is not a node of this graph
    Dangling,
    SelfLoop,
    /// The unordered pair is already connected
    Duplicate,
}

/// Typed node/edge graph
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_keys: HashSet<EdgeKey>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from foreign parts, dropping anything that breaks its invariants
    ///
    /// Duplicate node ids keep the first node. Dangling, self-loop and
    /// duplicate edges are removed.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut graph = Self::new();
        let mut duplicate_nodes = 0usize;
        let mut rejected_edges = 0usize;

        for node in nodes {
            if !graph.add_node(node) {
                duplicate_nodes += 1;
            }
        }
        for edge in edges {
            if graph.add_edge(edge).is_err() {
                rejected_edges += 1;
            }
        }

        if duplicate_nodes > 0 || rejected_edges > 0 {
            warn!(
                duplicate_nodes,
                rejected_edges, "Dropped malformed graph elements"
            );
        }

        graph
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }

    /// Add a node; returns false if its id is taken
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), EdgeRejection> {
        if edge.is_self_loop() {
            return Err(EdgeRejection::SelfLoop);
        }
        if !self.contains_node(&edge.source_node_id) || !self.contains_node(&edge.target_node_id) {
            return Err(EdgeRejection::Dangling);
        }
        if !self.edge_keys.insert(edge.key()) {
            return Err(EdgeRejection::Duplicate);
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_keys.contains(&EdgeKey::new(a, b))
    }

    /// The edge connecting `a` and `b`, in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        if !self.has_edge(a, b) {
            return None;
        }
        let key = EdgeKey::new(a, b);
        self.edges.iter().find(|e| e.key() == key)
    }

    /// Ids of nodes sharing an edge with `id`, read from the current edges
    pub fn neighbors(&self, id: &str) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter_map(|e| e.other_end(id))
            .map(str::to_string)
            .collect()
    }

    pub fn degree(&self, id: &str) -> usize {
        self.edges.iter().filter(|e| e.touches(id)).count()
    }

    /// Move a node; returns false if it does not exist
    pub(crate) fn set_position(&mut self, id: &str, position: Point) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.nodes[i].position = position;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{EdgeStyle, NodePayload};

    fn concept(id: &str) -> GraphNode {
        GraphNode::new(
            id,
            id,
            Point::new(50.0, 50.0),
            NodePayload::Concept {
                term: id.to_string(),
                document_ids: Vec::new(),
            },
        )
    }

    #[test]
    fn test_add_edge_rejections() {
        let mut graph = KnowledgeGraph::new();
        assert!(graph.add_node(concept("a")));
        assert!(graph.add_node(concept("b")));
        assert!(!graph.add_node(concept("a")));

        assert_eq!(graph.add_edge(GraphEdge::new("a", "b", EdgeStyle::Solid)), Ok(()));
        assert_eq!(
            graph.add_edge(GraphEdge::new("b", "a", EdgeStyle::Dashed)),
            Err(EdgeRejection::Duplicate)
        );
        assert_eq!(
            graph.add_edge(GraphEdge::new("a", "a", EdgeStyle::Solid)),
            Err(EdgeRejection::SelfLoop)
        );
        assert_eq!(
            graph.add_edge(GraphEdge::new("a", "zzz", EdgeStyle::Solid)),
            Err(EdgeRejection::Dangling)
        );
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge("b", "a"));
    }

    #[test]
    fn test_from_parts_sanitizes() {
        let graph = KnowledgeGraph::from_parts(
            vec![concept("a"), concept("b"), concept("c"), concept("a")],
            vec![
                GraphEdge::new("a", "b", EdgeStyle::Solid),
                GraphEdge::new("b", "a", EdgeStyle::Solid),
                GraphEdge::new("a", "missing", EdgeStyle::Solid),
                GraphEdge::new("c", "c", EdgeStyle::Solid),
                GraphEdge::new("b", "c", EdgeStyle::Dotted),
            ],
        );
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_neighbors_follow_current_edges() {
        let mut graph = KnowledgeGraph::from_parts(
            vec![concept("a"), concept("b"), concept("c")],
            vec![GraphEdge::new("a", "b", EdgeStyle::Solid)],
        );
        assert_eq!(graph.neighbors("a").into_iter().collect::<Vec<_>>(), vec!["b"]);

        graph.add_edge(GraphEdge::new("c", "a", EdgeStyle::Solid)).unwrap();
        assert_eq!(graph.neighbors("a").len(), 2);
        assert_eq!(graph.degree("a"), 2);
        assert!(graph.neighbors("missing").is_empty());
    }

    #[test]
    fn test_set_position() {
        let mut graph = KnowledgeGraph::from_parts(vec![concept("a")], Vec::new());
        assert!(graph.set_position("a", Point::new(1.0, 2.0)));
        assert_eq!(graph.node("a").unwrap().position, Point::new(1.0, 2.0));
        assert!(!graph.set_position("b", Point::ORIGIN));
    }
}
