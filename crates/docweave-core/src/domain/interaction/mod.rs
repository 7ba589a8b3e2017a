//! Graph interaction controller
//!
//! View state and its transitions are framework-agnostic: [`transition`] is a
//! pure `(state, event) -> state` function, and [`GraphController`] applies
//! it to the graph it owns.
//!
//! Drag lifecycle:
//!
//! ```text
//!            PointerDown(node)
//!   Idle ──────────────────────▶ Dragging ──┐ PointerMove
//!    ▲                              │  ▲     │ (position = pointer - offset,
//!    │   PointerUp / PointerLeft    │  └─────┘  clamped to the canvas)
//!    └──────────────────────────────┘
//! ```
//!
//! A drag whose node disappears is reset to idle on the next move.

mod controller;
mod event;
mod reducer;
mod snapshot;
mod view_state;

pub use controller::GraphController;
pub use event::InteractionEvent;
pub use reducer::{Transition, transition};
pub use snapshot::RenderSnapshot;
pub use view_state::{DragState, FIT_ZOOM, MAX_ZOOM, MIN_ZOOM, ViewState, ZOOM_STEP};
