//! Input events for the interaction state machine

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::graph::{NodeKind, Point};

/// A discrete user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// Pointer pressed on a node
    #[serde(rename_all = "camelCase")]
    PointerDown { node_id: String, pointer: Point },
    PointerMove { pointer: Point },
    PointerUp,
    PointerLeftCanvas,
    /// Toggles selection of the node
    #[serde(rename_all = "camelCase")]
    NodeClicked { node_id: String },
    ClearSelection,
    #[serde(rename_all = "camelCase")]
    Hover { node_id: Option<String> },
    SearchChanged { term: String },
    ToggleTypeFilter { kind: NodeKind },
    SetTypeFilters { kinds: BTreeSet<NodeKind> },
    ZoomIn,
    ZoomOut,
    Pan { delta: Point },
    ResetView,
    FitToScreen,
}

impl InteractionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::PointerLeftCanvas => "pointer_left_canvas",
            Self::NodeClicked { .. } => "node_clicked",
            Self::ClearSelection => "clear_selection",
            Self::Hover { .. } => "hover",
            Self::SearchChanged { .. } => "search_changed",
            Self::ToggleTypeFilter { .. } => "toggle_type_filter",
            Self::SetTypeFilters { .. } => "set_type_filters",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::Pan { .. } => "pan",
            Self::ResetView => "reset_view",
            Self::FitToScreen => "fit_to_screen",
        }
    }
}
