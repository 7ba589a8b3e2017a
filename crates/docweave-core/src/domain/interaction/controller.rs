//! Graph interaction controller
//!
//! Owns the live graph and its view state. Every mutation goes through
//! [`GraphController::dispatch`] or a graph replacement; renderers only ever
//! see [`RenderSnapshot`]s.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::graph::{CanvasBounds, GraphExport, GraphNode, KnowledgeGraph, Point};
use crate::error::Result;
use crate::pipeline::AnalysisOutcome;

use super::event::InteractionEvent;
use super::reducer::transition;
use super::snapshot::RenderSnapshot;
use super::view_state::{DragState, ViewState};

#[derive(Debug, Clone)]
pub struct GraphController {
    graph: KnowledgeGraph,
    state: ViewState,
    bounds: CanvasBounds,
    applied_generation: Option<u64>,
}

impl GraphController {
    /// Controller over an empty graph
    pub fn new(bounds: CanvasBounds) -> Self {
        Self::with_graph(KnowledgeGraph::new(), bounds)
    }

    pub fn with_graph(graph: KnowledgeGraph, bounds: CanvasBounds) -> Self {
        Self {
            graph,
            state: ViewState::default(),
            bounds,
            applied_generation: None,
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    /// Generation of the last applied analysis, if any
    pub fn applied_generation(&self) -> Option<u64> {
        self.applied_generation
    }

    /// Apply an event and return the resulting frame
    pub fn dispatch(&mut self, event: InteractionEvent) -> RenderSnapshot {
        self.apply(&event);
        self.snapshot()
    }

    /// Apply an event without building a snapshot
    pub fn apply(&mut self, event: &InteractionEvent) {
        let result = transition(&self.state, event, &self.graph, &self.bounds);
        if let Some((node_id, position)) = result.moved {
            self.graph.set_position(&node_id, position);
        }
        self.state = result.state;
        debug!(event = event.name(), dragging = self.state.is_dragging(), "Interaction applied");
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::compute(&self.graph, &self.state)
    }

    /// Swap in a rebuilt graph
    ///
    /// Zoom, pan, filters and search carry over. Selection, hover and an
    /// active drag are dropped if their node is gone.
    pub fn replace_graph(&mut self, graph: KnowledgeGraph) {
        self.graph = graph;

        if let Some(id) = self.state.selected_node_id.as_deref() {
            if !self.graph.contains_node(id) {
                self.state.selected_node_id = None;
            }
        }
        if let Some(id) = self.state.hovered_node_id.as_deref() {
            if !self.graph.contains_node(id) {
                self.state.hovered_node_id = None;
            }
        }
        if let DragState::Dragging { node_id, .. } = &self.state.drag {
            if !self.graph.contains_node(node_id) {
                warn!(node_id = %node_id, "Dragged node removed by rebuild, resetting drag");
                self.state.drag = DragState::Idle;
            }
        }
    }

    /// Apply an analysis outcome unless a newer one was already applied
    ///
    /// Returns whether the outcome was applied.
    pub fn apply_outcome(&mut self, outcome: AnalysisOutcome) -> bool {
        if let Some(current) = self.applied_generation {
            if outcome.generation <= current {
                warn!(
                    stale_generation = outcome.generation,
                    current_generation = current,
                    "Ignoring stale analysis result"
                );
                return false;
            }
        }

        info!(
            generation = outcome.generation,
            nodes = outcome.graph.node_count(),
            edges = outcome.graph.edge_count(),
            "Applying analysis result"
        );
        self.applied_generation = Some(outcome.generation);
        self.replace_graph(outcome.graph);
        true
    }

    pub fn press(&mut self, node_id: impl Into<String>, pointer: Point) -> RenderSnapshot {
        self.dispatch(InteractionEvent::PointerDown {
            node_id: node_id.into(),
            pointer,
        })
    }

    pub fn move_pointer(&mut self, pointer: Point) -> RenderSnapshot {
        self.dispatch(InteractionEvent::PointerMove { pointer })
    }

    pub fn release(&mut self) -> RenderSnapshot {
        self.dispatch(InteractionEvent::PointerUp)
    }

    pub fn click(&mut self, node_id: impl Into<String>) -> RenderSnapshot {
        self.dispatch(InteractionEvent::NodeClicked {
            node_id: node_id.into(),
        })
    }

    pub fn search(&mut self, term: impl Into<String>) -> RenderSnapshot {
        self.dispatch(InteractionEvent::SearchChanged { term: term.into() })
    }

    pub fn zoom_in(&mut self) -> RenderSnapshot {
        self.dispatch(InteractionEvent::ZoomIn)
    }

    pub fn zoom_out(&mut self) -> RenderSnapshot {
        self.dispatch(InteractionEvent::ZoomOut)
    }

    pub fn reset_view(&mut self) -> RenderSnapshot {
        self.dispatch(InteractionEvent::ResetView)
    }

    pub fn fit_to_screen(&mut self) -> RenderSnapshot {
        self.dispatch(InteractionEvent::FitToScreen)
    }

    /// Nearest visible node within `radius` of a canvas point
    pub fn node_at(&self, point: Point, radius: f64) -> Option<&GraphNode> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| self.state.is_visible(n))
            .map(|n| (n, n.position.distance(point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n)
    }

    /// Snapshot the whole graph for export
    pub fn export(&self) -> GraphExport {
        GraphExport::from_graph(&self.graph, Utc::now())
    }

    pub fn export_json(&self) -> Result<String> {
        self.export().to_json()
    }
}
