//! Pure transition function over [`ViewState`]
//!
//! `transition` never touches the graph. A drag update is returned as a
//! position change for the caller to apply.

use tracing::{debug, warn};

use crate::domain::graph::{CanvasBounds, KnowledgeGraph, Point};

use super::event::InteractionEvent;
use super::view_state::{DragState, ViewState};

/// Result of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    /// Node moved by a drag, with its clamped position
    pub moved: Option<(String, Point)>,
}

impl Transition {
    fn state(state: ViewState) -> Self {
        Self { state, moved: None }
    }
}

/// Apply one event to the view state
pub fn transition(
    state: &ViewState,
    event: &InteractionEvent,
    graph: &KnowledgeGraph,
    bounds: &CanvasBounds,
) -> Transition {
    let mut next = state.clone();

    match event {
        InteractionEvent::PointerDown { node_id, pointer } => match graph.node(node_id) {
            Some(node) => {
                next.drag = DragState::Dragging {
                    node_id: node_id.clone(),
                    offset: *pointer - node.position,
                };
                debug!(node_id = %node_id, "Drag started");
            }
            None => next.drag = DragState::Idle,
        },
        InteractionEvent::PointerMove { pointer } => {
            if let DragState::Dragging { node_id, offset } = &state.drag {
                if graph.contains_node(node_id) {
                    let position = bounds.clamp(*pointer - *offset);
                    return Transition {
                        state: next,
                        moved: Some((node_id.clone(), position)),
                    };
                }
                warn!(node_id = %node_id, "Dragged node no longer exists, resetting drag");
                next.drag = DragState::Idle;
            }
        }
        InteractionEvent::PointerUp | InteractionEvent::PointerLeftCanvas => {
            next.drag = DragState::Idle;
        }
        InteractionEvent::NodeClicked { node_id } => {
            if next.selected_node_id.as_deref() == Some(node_id.as_str()) {
                next.selected_node_id = None;
            } else if graph.contains_node(node_id) {
                next.selected_node_id = Some(node_id.clone());
            }
        }
        InteractionEvent::ClearSelection => next.selected_node_id = None,
        InteractionEvent::Hover { node_id } => {
            next.hovered_node_id = node_id.clone().filter(|id| graph.contains_node(id));
        }
        InteractionEvent::SearchChanged { term } => next.search_term = term.clone(),
        InteractionEvent::ToggleTypeFilter { kind } => next.toggle_filter(*kind),
        InteractionEvent::SetTypeFilters { kinds } => next.type_filters = kinds.clone(),
        InteractionEvent::ZoomIn => next.zoom_in(),
        InteractionEvent::ZoomOut => next.zoom_out(),
        InteractionEvent::Pan { delta } => next.pan = next.pan + *delta,
        InteractionEvent::ResetView => next.reset_view(),
        InteractionEvent::FitToScreen => next.fit_to_screen(),
    }

    Transition::state(next)
}
