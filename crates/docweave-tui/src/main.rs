//! Docweave TUI - interactive knowledge graph canvas
//!
//! Usage: `docweave-tui [documents.json]`
//!
//! - Drag nodes with the mouse, click to select and see connections
//! - `/` search, `1`-`5` toggle node kinds, `+`/`-` zoom, arrows pan
//! - `r` reset view, `f` fit to screen, `l` reload, `Tab` next node, `q` quit

mod app;

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docweave_core::config::Config;
use docweave_core::domain::interaction::RenderSnapshot;
use docweave_core::visualization::{GraphStatusBar, GraphWidget};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Logs go to a file; the terminal belongs to the UI
fn init_logging() -> anyhow::Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("tui.log"))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docweave=info".parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::load()?;
    let source = std::env::args().nth(1).map(PathBuf::from);
    let mut app = App::new(&config, source);
    app.reload();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    while app.running {
        app.poll_analysis();
        terminal.draw(|frame| draw(frame, app))?;

        // Handle input
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let snapshot = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Canvas and details
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Help or search prompt
        ])
        .split(frame.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[0]);

    let graph = GraphWidget::new(&snapshot, app.controller().bounds()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Knowledge Graph "),
    );
    app.graph_area = graph.graph_area(main_chunks[0]);
    frame.render_widget(graph, main_chunks[0]);

    draw_details(frame, &snapshot, main_chunks[1]);

    frame.render_widget(GraphStatusBar::new(&snapshot), chunks[1]);

    let prompt = if app.search_mode {
        Paragraph::new(format!("Search: {}_", snapshot.view_state.search_term))
            .style(Style::default().fg(Color::Yellow))
    } else {
        Paragraph::new(format!(
            "{} | q quit  / search  1-5 kinds  +/- zoom  arrows pan  r reset  f fit  l reload",
            app.status
        ))
        .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(prompt, chunks[2]);
}

fn draw_details(frame: &mut Frame, snapshot: &RenderSnapshot, area: Rect) {
    let focus = snapshot
        .selected_node_id()
        .or(snapshot.view_state.hovered_node_id.as_deref())
        .and_then(|id| snapshot.node(id));

    let text = match focus {
        Some(node) => {
            let mut lines = vec![
                node.label.clone(),
                String::new(),
                format!("Kind:      {}", node.kind),
                format!("Id:        {}", node.id),
                format!("Position:  {}", node.position),
            ];
            if snapshot.selected_node_id() == Some(node.id.as_str()) {
                lines.push(format!("Connected: {}", snapshot.connected_node_ids.len()));
            }
            lines.push(String::new());
            lines.push(node.payload.text());
            lines.join("\n")
        }
        None => String::from("Click a node or press Tab\nto see its details"),
    };

    let details = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(details, area);
}
