//! Commands module - operations as library functions
//!
//! These commands are used by the CLI and TUI.

pub mod graph;
pub mod synthesis;
