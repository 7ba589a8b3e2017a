//! Text outline of a knowledge graph
//!
//! Renders a [`RenderSnapshot`] as an indented tree: each visible document
//! with its visible neighbours, followed by nodes that touch no document.

use std::collections::BTreeSet;

use crate::domain::graph::{EdgeStyle, GraphNode, NodeKind};
use crate::domain::interaction::RenderSnapshot;

/// Shown when nothing is visible
pub const EMPTY_STATE_MESSAGE: &str =
    "No nodes to display. Load documents or clear the search and type filters.";

/// Tree characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineStyle {
    /// ASCII characters only (works everywhere)
    Ascii,
    /// Unicode box-drawing characters
    #[default]
    Unicode,
}

impl OutlineStyle {
    fn branch(&self, is_last: bool) -> &'static str {
        match (self, is_last) {
            (Self::Ascii, true) => "`-- ",
            (Self::Ascii, false) => "+-- ",
            (Self::Unicode, true) => "└── ",
            (Self::Unicode, false) => "├── ",
        }
    }

    fn edge_marker(&self, style: EdgeStyle) -> &'static str {
        match (self, style) {
            (Self::Ascii, EdgeStyle::Solid) => "==",
            (Self::Ascii, EdgeStyle::Dashed) => "--",
            (Self::Ascii, EdgeStyle::Dotted) => "..",
            (Self::Unicode, EdgeStyle::Solid) => "──",
            (Self::Unicode, EdgeStyle::Dashed) => "╌╌",
            (Self::Unicode, EdgeStyle::Dotted) => "┈┈",
        }
    }
}

/// Options for rendering the outline
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    pub style: OutlineStyle,
    /// Show node ids
    pub show_ids: bool,
    /// Show canvas positions
    pub show_positions: bool,
    pub show_legend: bool,
    /// Neighbours listed per document (None for all)
    pub max_neighbors: Option<usize>,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            style: OutlineStyle::Unicode,
            show_ids: true,
            show_positions: false,
            show_legend: true,
            max_neighbors: None,
        }
    }
}

impl OutlineOptions {
    /// ASCII-only options for basic terminals
    pub fn ascii() -> Self {
        Self {
            style: OutlineStyle::Ascii,
            ..Default::default()
        }
    }

    /// Labels only
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_positions: false,
            show_legend: false,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: OutlineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_positions(mut self, show: bool) -> Self {
        self.show_positions = show;
        self
    }

    pub fn with_max_neighbors(mut self, max: usize) -> Self {
        self.max_neighbors = Some(max);
        self
    }
}

/// Text renderer for a graph snapshot
pub struct GraphOutline<'a> {
    snapshot: &'a RenderSnapshot,
    options: OutlineOptions,
}

impl<'a> GraphOutline<'a> {
    pub fn new(snapshot: &'a RenderSnapshot) -> Self {
        Self {
            snapshot,
            options: OutlineOptions::default(),
        }
    }

    pub fn with_options(snapshot: &'a RenderSnapshot, options: OutlineOptions) -> Self {
        Self { snapshot, options }
    }

    /// Render the full outline
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.render_header());
        output.push('\n');

        if self.snapshot.is_empty() {
            output.push('\n');
            output.push_str(EMPTY_STATE_MESSAGE);
            output.push('\n');
            return output;
        }

        let mut attached: BTreeSet<&str> = BTreeSet::new();
        for doc in self.snapshot.nodes.iter().filter(|n| n.kind == NodeKind::Document) {
            output.push('\n');
            output.push_str(&self.node_line(doc));
            output.push('\n');
            attached.insert(doc.id.as_str());

            let neighbors = self.neighbors(doc);
            let shown = match self.options.max_neighbors {
                Some(max) => neighbors.len().min(max),
                None => neighbors.len(),
            };
            for (i, &(node, style, label)) in neighbors.iter().take(shown).enumerate() {
                attached.insert(node.id.as_str());
                let is_last = i + 1 == shown && shown == neighbors.len();
                output.push_str(self.options.style.branch(is_last));
                output.push_str(self.options.style.edge_marker(style));
                if let Some(label) = label {
                    output.push_str(&format!(" {} ", label));
                } else {
                    output.push(' ');
                }
                output.push_str(&self.node_line(node));
                output.push('\n');
            }
            if shown < neighbors.len() {
                output.push_str(self.options.style.branch(true));
                output.push_str(&format!("... {} more\n", neighbors.len() - shown));
            }
        }

        let unattached: Vec<&GraphNode> = self
            .snapshot
            .nodes
            .iter()
            .filter(|n| !attached.contains(n.id.as_str()))
            .collect();
        if !unattached.is_empty() {
            output.push_str("\nOther nodes\n");
            for (i, node) in unattached.iter().enumerate() {
                output.push_str(self.options.style.branch(i + 1 == unattached.len()));
                output.push_str(&self.node_line(node));
                output.push('\n');
            }
        }

        if self.options.show_legend {
            output.push('\n');
            output.push_str(&self.render_legend());
            output.push('\n');
        }

        output
    }

    fn render_header(&self) -> String {
        let documents = self
            .snapshot
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Document)
            .count();
        format!(
            "Knowledge Graph ({} of {} nodes, {} edges, {} documents)",
            self.snapshot.nodes.len(),
            self.snapshot.total_nodes,
            self.snapshot.edges.len(),
            documents
        )
    }

    fn render_legend(&self) -> String {
        let kinds: Vec<String> = NodeKind::all()
            .iter()
            .map(|k| format!("[{}] {}", k.icon(), k))
            .collect();
        let styles: Vec<String> = EdgeStyle::all()
            .iter()
            .map(|s| format!("{} {}", self.options.style.edge_marker(*s), s))
            .collect();
        format!("Legend: {}\n        {}  * highlighted", kinds.join("  "), styles.join("  "))
    }

    fn node_line(&self, node: &GraphNode) -> String {
        let mut line = format!("[{}] {}", node.kind.icon(), node.label);
        if self.options.show_ids {
            line.push_str(&format!(" ({})", node.id));
        }
        if self.options.show_positions {
            line.push_str(&format!(" @ {}", node.position));
        }
        if self.snapshot.is_highlighted(&node.id) {
            line.push_str(" *");
        }
        line
    }

    /// Visible neighbours of a node with the connecting edge style and label
    fn neighbors(&self, node: &GraphNode) -> Vec<(&'a GraphNode, EdgeStyle, Option<&'a str>)> {
        let snapshot: &'a RenderSnapshot = self.snapshot;
        snapshot
            .edges
            .iter()
            .filter_map(|edge| {
                let other = edge.other_end(&node.id)?;
                let other = snapshot.node(other)?;
                Some((other, edge.style, edge.label.as_deref()))
            })
            .collect()
    }

    /// Render a compact single-line status
    pub fn render_compact(&self) -> String {
        let view = &self.snapshot.view_state;
        let mut line = format!(
            "[{}/{} nodes] Edges:{} Zoom:{:.1}x",
            self.snapshot.nodes.len(),
            self.snapshot.total_nodes,
            self.snapshot.edges.len(),
            view.zoom
        );
        if view.has_search() {
            line.push_str(&format!(" Search:\"{}\" ({} matches)", view.search_term, self.snapshot.search_matches.len()));
        }
        if let Some(selected) = &view.selected_node_id {
            line.push_str(&format!(" Selected:{} ({} connected)", selected, self.snapshot.connected_node_ids.len()));
        }
        line
    }
}

impl std::fmt::Display for GraphOutline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{Document, DocumentSet};
    use crate::domain::graph::{GraphBuilder, KnowledgeGraph};
    use crate::domain::interaction::{GraphController, ViewState};
    use crate::domain::synthesis::SynthesisResult;

    fn controller() -> GraphController {
        let docs = DocumentSet::new(vec![
            Document::new(1u64, "Budget", "Finance"),
            Document::new(2u64, "Forecast", "Finance"),
        ]);
        let builder = GraphBuilder::default();
        let graph = builder.build(&docs, &SynthesisResult::default());
        GraphController::with_graph(graph, builder.bounds())
    }

    #[test]
    fn test_outline_lists_documents_and_neighbours() {
        let snapshot = controller().snapshot();
        let text = GraphOutline::new(&snapshot).render();

        assert!(text.starts_with("Knowledge Graph ("));
        assert!(text.contains("[D] Budget (doc:1)"));
        assert!(text.contains("── mentions [C] Finance (concept:finance)"));
        assert!(text.contains("Legend:"));
    }

    #[test]
    fn test_ascii_outline() {
        let snapshot = controller().snapshot();
        let text = GraphOutline::with_options(&snapshot, OutlineOptions::ascii()).render();
        assert!(text.is_ascii());
    }

    #[test]
    fn test_empty_state_message() {
        let snapshot = RenderSnapshot::compute(&KnowledgeGraph::new(), &ViewState::default());
        let text = GraphOutline::new(&snapshot).render();
        assert!(text.contains(EMPTY_STATE_MESSAGE));
    }

    #[test]
    fn test_search_marks_highlighted() {
        let mut controller = controller();
        let snapshot = controller.search("forecast");
        let text = GraphOutline::with_options(&snapshot, OutlineOptions::minimal()).render();
        assert!(text.contains("[D] Forecast *"));
        assert!(!text.contains("Budget"));

        let compact = GraphOutline::new(&snapshot).render_compact();
        assert!(compact.contains("Search:\"forecast\" (1 matches)"));
    }

    #[test]
    fn test_max_neighbors() {
        let snapshot = controller().snapshot();
        let text = GraphOutline::with_options(&snapshot, OutlineOptions::default().with_max_neighbors(1)).render();
        assert!(text.contains("more"));
    }
}
