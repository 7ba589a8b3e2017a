//! Knowledge graph visualization
//!
//! Renderers consume read-only [`RenderSnapshot`](crate::domain::interaction::RenderSnapshot)s.
//!
//! # Features
//!
//! - **Text outline**: documents with their neighbours, Unicode or ASCII, for CLI output
//! - **Ratatui widgets**: `GraphWidget` and `GraphStatusBar` for TUI integration
//! - **Empty state**: both renderers explain an empty view instead of drawing nothing
//!
//! # Example
//!
//! ```ignore
//! use docweave_core::visualization::{GraphOutline, GraphWidget};
//!
//! let snapshot = controller.snapshot();
//! println!("{}", GraphOutline::new(&snapshot));
//!
//! let widget = GraphWidget::new(&snapshot, controller.bounds())
//!     .block(Block::default().title("Graph").borders(Borders::ALL));
//! ```

mod outline;
mod widget;

pub use outline::{EMPTY_STATE_MESSAGE, GraphOutline, OutlineOptions, OutlineStyle};
pub use widget::{GraphColors, GraphStatusBar, GraphWidget, Viewport};
