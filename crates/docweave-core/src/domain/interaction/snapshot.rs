//! Read-only render snapshots

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::graph::{GraphEdge, GraphNode, KnowledgeGraph};

use super::view_state::ViewState;

/// What a renderer needs to paint one frame
///
/// `nodes` and `edges` hold only visible elements. An edge is visible when
/// both endpoints are.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub view_state: ViewState,
    /// Nodes matching a non-empty search term
    pub search_matches: BTreeSet<String>,
    /// Neighbours of the selected node
    pub connected_node_ids: BTreeSet<String>,
    /// Search matches, the selection and its neighbours
    pub highlighted_node_ids: BTreeSet<String>,
    /// Nodes in the whole graph, visible or not
    pub total_nodes: usize,
}

impl RenderSnapshot {
    pub fn compute(graph: &KnowledgeGraph, state: &ViewState) -> Self {
        let nodes: Vec<GraphNode> = graph
            .nodes()
            .iter()
            .filter(|n| state.is_visible(n))
            .cloned()
            .collect();
        let visible: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges: Vec<GraphEdge> = graph
            .edges()
            .iter()
            .filter(|e| {
                visible.contains(e.source_node_id.as_str()) && visible.contains(e.target_node_id.as_str())
            })
            .cloned()
            .collect();

        let search_matches: BTreeSet<String> = if state.has_search() {
            graph
                .nodes()
                .iter()
                .filter(|n| state.matches_search(n))
                .map(|n| n.id.clone())
                .collect()
        } else {
            BTreeSet::new()
        };

        let selected = state
            .selected_node_id
            .as_deref()
            .filter(|id| graph.contains_node(id));
        let connected_node_ids = match selected {
            Some(id) => graph.neighbors(id),
            None => BTreeSet::new(),
        };

        let mut highlighted_node_ids = search_matches.clone();
        highlighted_node_ids.extend(connected_node_ids.iter().cloned());
        if let Some(id) = selected {
            highlighted_node_ids.insert(id.to_string());
        }

        Self {
            nodes,
            edges,
            view_state: state.clone(),
            search_matches,
            connected_node_ids,
            highlighted_node_ids,
            total_nodes: graph.node_count(),
        }
    }

    /// Nothing visible; renderers show an empty-state panel
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.view_state.selected_node_id.as_deref()
    }

    /// Whether a node should be drawn faded
    ///
    /// Only a selection dims; everything outside it and its neighbours fades.
    pub fn is_dimmed(&self, node_id: &str) -> bool {
        match self.selected_node_id() {
            Some(selected) => selected != node_id && !self.connected_node_ids.contains(node_id),
            None => false,
        }
    }

    /// Whether an edge should be drawn faded
    pub fn is_edge_dimmed(&self, edge: &GraphEdge) -> bool {
        match self.selected_node_id() {
            Some(selected) => !edge.touches(selected),
            None => false,
        }
    }

    pub fn is_highlighted(&self, node_id: &str) -> bool {
        self.highlighted_node_ids.contains(node_id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
