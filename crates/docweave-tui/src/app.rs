//! TUI application state
//!
//! Translates terminal input into interaction events and applies analysis
//! results as they arrive from background tasks.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use docweave_core::config::Config;
use docweave_core::domain::graph::{CanvasBounds, KnowledgeGraph, NodeKind, Point};
use docweave_core::domain::interaction::{GraphController, InteractionEvent, RenderSnapshot};
use docweave_core::pipeline::{AnalysisPipeline, AnalysisRun, JsonFileSource};
use docweave_core::visualization::Viewport;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Canvas units moved per arrow key press
pub const PAN_STEP: f64 = 20.0;

/// Smallest pick radius in canvas units
const MIN_PICK_RADIUS: f64 = 15.0;

type AnalysisMessage = docweave_core::Result<AnalysisRun>;

/// Left button press that may become a drag or a click
#[derive(Debug, Clone, PartialEq)]
struct Press {
    node_id: String,
    moved: bool,
}

pub struct App {
    controller: GraphController,
    pipeline: AnalysisPipeline,
    source: Option<PathBuf>,
    tx: mpsc::UnboundedSender<AnalysisMessage>,
    rx: mpsc::UnboundedReceiver<AnalysisMessage>,
    press: Option<Press>,
    /// Graph area from the last draw, used to map mouse cells
    pub graph_area: Rect,
    pub search_mode: bool,
    pub status: String,
    pub running: bool,
}

impl App {
    pub fn new(config: &Config, source: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: GraphController::new(config.canvas.bounds()),
            pipeline: AnalysisPipeline::new(config),
            source,
            tx,
            rx,
            press: None,
            graph_area: Rect::default(),
            search_mode: false,
            status: String::from("No documents loaded"),
            running: true,
        }
    }

    /// App showing an already built graph
    pub fn with_graph(graph: KnowledgeGraph, bounds: CanvasBounds) -> Self {
        let mut app = Self::new(&Config::default(), None);
        app.controller = GraphController::with_graph(graph, bounds);
        app.status = String::from("Ready");
        app
    }

    pub fn controller(&self) -> &GraphController {
        &self.controller
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.controller.snapshot()
    }

    /// Start a background analysis of the source file
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            self.status = String::from("No document file given");
            return;
        };
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        self.status = format!("Analyzing {}...", path.display());
        info!(path = %path.display(), "Analysis requested");

        tokio::spawn(async move {
            let source = JsonFileSource::new(path);
            let message = pipeline.analyze_source(&source).await;
            if tx.send(message).is_err() {
                debug!("App closed before analysis finished");
            }
        });
    }

    /// Apply finished analyses; stale results are discarded
    pub fn poll_analysis(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_analysis(message);
        }
    }

    fn handle_analysis(&mut self, message: AnalysisMessage) {
        match message {
            Ok(AnalysisRun::Completed(outcome)) => {
                let documents = outcome.documents.len();
                let generation = outcome.generation;
                if self.controller.apply_outcome(outcome) {
                    self.status = format!("Loaded {} documents (run {})", documents, generation);
                }
            }
            Ok(AnalysisRun::Superseded { generation, latest }) => {
                debug!(generation, latest, "Dropped superseded analysis");
            }
            Err(e) => {
                warn!(code = e.code(), error = %e, "Analysis failed");
                self.status = format!("Error [{}]: {}", e.code(), e);
            }
        }
    }

    fn viewport(&self) -> Viewport {
        let view = self.controller.view_state();
        Viewport::new(self.graph_area, self.controller.bounds(), view.zoom, view.pan)
    }

    fn dispatch(&mut self, event: InteractionEvent) {
        self.controller.apply(&event);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.search_mode {
            self.handle_search_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('+') | KeyCode::Char('=') => self.dispatch(InteractionEvent::ZoomIn),
            KeyCode::Char('-') => self.dispatch(InteractionEvent::ZoomOut),
            KeyCode::Left => self.pan(-PAN_STEP, 0.0),
            KeyCode::Right => self.pan(PAN_STEP, 0.0),
            KeyCode::Up => self.pan(0.0, -PAN_STEP),
            KeyCode::Down => self.pan(0.0, PAN_STEP),
            KeyCode::Char('r') => self.dispatch(InteractionEvent::ResetView),
            KeyCode::Char('f') => self.dispatch(InteractionEvent::FitToScreen),
            KeyCode::Char('l') => self.reload(),
            KeyCode::Char('/') => self.search_mode = true,
            KeyCode::Tab => self.cycle_selection(),
            KeyCode::Esc => self.dispatch(InteractionEvent::ClearSelection),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                if let Some(kind) = NodeKind::all().get(index) {
                    self.dispatch(InteractionEvent::ToggleTypeFilter { kind: *kind });
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let mut term = self.controller.view_state().search_term.clone();
        match code {
            KeyCode::Enter => {
                self.search_mode = false;
                return;
            }
            KeyCode::Esc => {
                self.search_mode = false;
                term.clear();
            }
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }
        self.dispatch(InteractionEvent::SearchChanged { term });
    }

    fn pan(&mut self, dx: f64, dy: f64) {
        self.dispatch(InteractionEvent::Pan {
            delta: Point::new(dx, dy),
        });
    }

    /// Select the next visible node after the current selection
    fn cycle_selection(&mut self) {
        let snapshot = self.snapshot();
        if snapshot.nodes.is_empty() {
            return;
        }
        let next = match snapshot.selected_node_id() {
            Some(current) => {
                let position = snapshot.nodes.iter().position(|n| n.id == current);
                let index = position.map(|i| (i + 1) % snapshot.nodes.len()).unwrap_or(0);
                &snapshot.nodes[index].id
            }
            None => &snapshot.nodes[0].id,
        };
        if snapshot.selected_node_id() != Some(next.as_str()) {
            self.dispatch(InteractionEvent::NodeClicked {
                node_id: next.clone(),
            });
        }
    }

    /// Mouse handling: press on a node starts a drag, release without
    /// movement counts as a click
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let viewport = self.viewport();
        let inside = viewport.contains(mouse.column, mouse.row);
        let point = viewport.unproject(mouse.column, mouse.row);
        let radius = (viewport.cell_width() * 2.0).max(MIN_PICK_RADIUS);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let hit = self.controller.node_at(point, radius).map(|n| n.id.clone());
                match hit {
                    Some(node_id) => {
                        self.dispatch(InteractionEvent::PointerDown {
                            node_id: node_id.clone(),
                            pointer: point,
                        });
                        self.press = Some(Press { node_id, moved: false });
                    }
                    None => self.dispatch(InteractionEvent::ClearSelection),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.press.is_none() {
                    return;
                }
                if !inside {
                    self.dispatch(InteractionEvent::PointerLeftCanvas);
                    return;
                }
                self.dispatch(InteractionEvent::PointerMove { pointer: point });
                if let Some(press) = self.press.as_mut() {
                    press.moved = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.dispatch(InteractionEvent::PointerUp);
                if let Some(press) = self.press.take() {
                    if !press.moved {
                        self.dispatch(InteractionEvent::NodeClicked {
                            node_id: press.node_id,
                        });
                    }
                }
            }
            MouseEventKind::Moved if inside => {
                let node_id = self.controller.node_at(point, radius).map(|n| n.id.clone());
                if self.controller.view_state().hovered_node_id != node_id {
                    self.dispatch(InteractionEvent::Hover { node_id });
                }
            }
            MouseEventKind::ScrollUp if inside => self.dispatch(InteractionEvent::ZoomIn),
            MouseEventKind::ScrollDown if inside => self.dispatch(InteractionEvent::ZoomOut),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use docweave_core::domain::document::{Document, DocumentSet};
    use docweave_core::pipeline::AnalysisOutcome;

    fn documents() -> DocumentSet {
        DocumentSet::new(vec![
            Document::new(1u64, "Budget", "Finance"),
            Document::new(2u64, "Forecast", "Finance"),
        ])
    }

    fn app() -> App {
        let outcome = AnalysisPipeline::default().analyze_now(documents());
        let mut app = App::with_graph(outcome.graph, CanvasBounds::default());
        // 800x600 canvas on 80x24 cells: one cell is 10 by 25 canvas units
        app.graph_area = Rect::new(0, 0, 80, 24);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn position(app: &App, id: &str) -> Point {
        app.controller().graph().node(id).unwrap().position
    }

    #[test]
    fn test_zoom_and_reset_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.controller().view_state().zoom, 1.2);
        assert_eq!(app.controller().view_state().pan, Point::new(PAN_STEP, 0.0));

        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.controller().view_state().zoom, 0.8);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.controller().view_state().zoom, 1.0);
        assert_eq!(app.controller().view_state().pan, Point::ORIGIN);
    }

    #[test]
    fn test_filter_keys_toggle_kinds() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('1')));
        let snapshot = app.snapshot();
        assert!(snapshot.nodes.iter().all(|n| n.kind != NodeKind::Document));

        app.handle_key(key(KeyCode::Char('1')));
        assert!(app.snapshot().nodes.iter().any(|n| n.kind == NodeKind::Document));
    }

    #[test]
    fn test_search_mode_edits_term() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "bud".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.controller().view_state().search_term, "bud");
        // 'q' is typed into the search, not treated as quit
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.running);
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.search_mode);
        let matches = app.snapshot().search_matches;
        assert!(matches.contains("doc:1"));
        assert!(!matches.contains("doc:2"));

        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.controller().view_state().search_term.is_empty());
    }

    #[test]
    fn test_tab_cycles_selection() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        let first = app.snapshot().nodes[0].id.clone();
        assert_eq!(app.snapshot().selected_node_id(), Some(first.as_str()));

        app.handle_key(key(KeyCode::Tab));
        assert_ne!(app.snapshot().selected_node_id(), Some(first.as_str()));

        app.handle_key(key(KeyCode::Esc));
        assert!(app.snapshot().selected_node_id().is_none());
    }

    #[test]
    fn test_press_and_release_selects() {
        let mut app = app();
        // doc:1 sits at (80, 80), cell (8, 3)
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 8, 3));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 8, 3));

        assert_eq!(app.snapshot().selected_node_id(), Some("doc:1"));
        assert_eq!(position(&app, "doc:1"), Point::new(80.0, 80.0));
    }

    #[test]
    fn test_drag_clamps_and_does_not_select() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 8, 3));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0));
        assert!(app.controller().view_state().is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));

        assert_eq!(position(&app, "doc:1"), Point::new(20.0, 20.0));
        assert!(!app.controller().view_state().is_dragging());
        assert!(app.snapshot().selected_node_id().is_none());
    }

    #[test]
    fn test_leaving_canvas_ends_drag() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 8, 3));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 120, 40));
        assert!(!app.controller().view_state().is_dragging());
        assert_eq!(position(&app, "doc:1"), Point::new(80.0, 80.0));
    }

    #[test]
    fn test_press_on_empty_canvas_clears_selection() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 79, 23));
        assert!(app.snapshot().selected_node_id().is_none());
    }

    #[tokio::test]
    async fn test_stale_analysis_is_ignored() {
        let mut app = App::new(&Config::default(), None);
        let pipeline = AnalysisPipeline::default();
        let older: AnalysisOutcome = pipeline.analyze_now(documents());
        let newer = pipeline.analyze_now(DocumentSet::new(vec![Document::new(9u64, "Memo", "Legal")]));

        app.tx.send(Ok(AnalysisRun::Completed(newer))).unwrap();
        app.tx.send(Ok(AnalysisRun::Completed(older))).unwrap();
        app.poll_analysis();

        assert_eq!(app.controller().applied_generation(), Some(2));
        assert!(app.controller().graph().contains_node("doc:9"));
        assert!(!app.controller().graph().contains_node("doc:1"));
    }

    #[test]
    fn test_reload_without_source() {
        let mut app = app();
        app.reload();
        assert_eq!(app.status, "No document file given");
    }
}
