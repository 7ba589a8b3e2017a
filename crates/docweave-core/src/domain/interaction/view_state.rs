//! Session-local view state

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::graph::{GraphNode, NodeKind, Point};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 0.2;
/// Zoom applied by fit-to-screen
pub const FIT_ZOOM: f64 = 0.8;

/// Drag state machine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    /// `offset` is the pointer position minus the node position at press time
    #[serde(rename_all = "camelCase")]
    Dragging { node_id: String, offset: Point },
}

/// Zoom, pan, selection, filters and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Point,
    pub selected_node_id: Option<String>,
    pub hovered_node_id: Option<String>,
    pub drag: DragState,
    pub search_term: String,
    pub type_filters: BTreeSet<NodeKind>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
            selected_node_id: None,
            hovered_node_id: None,
            drag: DragState::Idle,
            search_term: String::new(),
            type_filters: NodeKind::all().iter().copied().collect(),
        }
    }
}

/// Round away float drift so zoom stays on the step grid
fn snap(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ViewState {
    pub fn dragged_node_id(&self) -> Option<&str> {
        match &self.drag {
            DragState::Dragging { node_id, .. } => Some(node_id),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn zoom_in(&mut self) {
        self.zoom = snap((self.zoom + ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM));
    }

    pub fn zoom_out(&mut self) {
        self.zoom = snap((self.zoom - ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM));
    }

    /// Zoom 1, no pan, no selection
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::ORIGIN;
        self.selected_node_id = None;
    }

    /// Zoom 0.8, no pan; selection is kept
    pub fn fit_to_screen(&mut self) {
        self.zoom = FIT_ZOOM;
        self.pan = Point::ORIGIN;
    }

    pub fn has_search(&self) -> bool {
        !self.search_term.trim().is_empty()
    }

    pub fn matches_search(&self, node: &GraphNode) -> bool {
        node.matches(&self.search_term)
    }

    /// Kind passes the filter and, with an active search, the node matches it
    pub fn is_visible(&self, node: &GraphNode) -> bool {
        self.type_filters.contains(&node.kind) && self.matches_search(node)
    }

    pub fn toggle_filter(&mut self, kind: NodeKind) {
        if !self.type_filters.remove(&kind) {
            self.type_filters.insert(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_and_bounds() {
        let mut state = ViewState::default();
        state.zoom_in();
        assert_eq!(state.zoom, 1.2);
        for _ in 0..10 {
            state.zoom_in();
        }
        assert_eq!(state.zoom, MAX_ZOOM);

        for _ in 0..10 {
            state.zoom_out();
        }
        assert_eq!(state.zoom, MIN_ZOOM);
        state.zoom_in();
        assert_eq!(state.zoom, 0.7);
    }

    #[test]
    fn test_reset_and_fit() {
        let mut state = ViewState {
            zoom: 1.6,
            pan: Point::new(30.0, -10.0),
            selected_node_id: Some("doc:1".into()),
            ..Default::default()
        };

        state.fit_to_screen();
        assert_eq!(state.zoom, FIT_ZOOM);
        assert_eq!(state.pan, Point::ORIGIN);
        assert_eq!(state.selected_node_id.as_deref(), Some("doc:1"));

        state.zoom_in();
        state.reset_view();
        assert_eq!(state.zoom, 1.0);
        assert!(state.selected_node_id.is_none());
    }

    #[test]
    fn test_toggle_filter() {
        let mut state = ViewState::default();
        assert_eq!(state.type_filters.len(), 5);
        state.toggle_filter(NodeKind::Entity);
        assert!(!state.type_filters.contains(&NodeKind::Entity));
        state.toggle_filter(NodeKind::Entity);
        assert!(state.type_filters.contains(&NodeKind::Entity));
    }
}
