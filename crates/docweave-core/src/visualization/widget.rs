//! Ratatui widgets for knowledge graph visualization
//!
//! `GraphWidget` paints a [`RenderSnapshot`] onto a terminal area through a
//! zoom- and pan-aware [`Viewport`]; `GraphStatusBar` is a one-line summary.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::domain::graph::{CanvasBounds, EdgeStyle, GraphEdge, NodeKind, Point};
use crate::domain::interaction::RenderSnapshot;

use super::outline::EMPTY_STATE_MESSAGE;

/// Color scheme for the graph widget
#[derive(Debug, Clone)]
pub struct GraphColors {
    pub document: Color,
    pub concept: Color,
    pub entity: Color,
    pub timeline: Color,
    pub insight: Color,
    pub edge: Color,
    /// Elements outside the selection
    pub dimmed: Color,
    pub legend: Color,
}

impl Default for GraphColors {
    fn default() -> Self {
        Self {
            document: Color::Blue,
            concept: Color::Green,
            entity: Color::Magenta,
            timeline: Color::Yellow,
            insight: Color::Cyan,
            edge: Color::Gray,
            dimmed: Color::DarkGray,
            legend: Color::DarkGray,
        }
    }
}

impl GraphColors {
    pub fn for_kind(&self, kind: NodeKind) -> Color {
        match kind {
            NodeKind::Document => self.document,
            NodeKind::Concept => self.concept,
            NodeKind::Entity => self.entity,
            NodeKind::Timeline => self.timeline,
            NodeKind::Insight => self.insight,
        }
    }
}

/// Maps canvas coordinates to terminal cells
///
/// Zoom scales around the canvas centre; pan is in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub canvas: CanvasBounds,
    pub zoom: f64,
    pub pan: Point,
}

impl Viewport {
    pub fn new(area: Rect, canvas: CanvasBounds, zoom: f64, pan: Point) -> Self {
        Self {
            area,
            canvas,
            zoom,
            pan,
        }
    }

    fn center(&self) -> Point {
        Point::new(self.canvas.width / 2.0, self.canvas.height / 2.0)
    }

    fn scale(&self) -> (f64, f64) {
        (
            f64::from(self.area.width) / self.canvas.width.max(1.0),
            f64::from(self.area.height) / self.canvas.height.max(1.0),
        )
    }

    /// Cell for a canvas point, or None when it falls outside the area
    pub fn project(&self, point: Point) -> Option<(u16, u16)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let center = self.center();
        let view = Point::new(
            (point.x - center.x) * self.zoom + center.x + self.pan.x,
            (point.y - center.y) * self.zoom + center.y + self.pan.y,
        );
        let (sx, sy) = self.scale();
        let col = (view.x * sx).floor();
        let row = (view.y * sy).floor();
        if col < 0.0 || row < 0.0 || col >= f64::from(self.area.width) || row >= f64::from(self.area.height) {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Canvas point at the centre of a cell
    pub fn unproject(&self, column: u16, row: u16) -> Point {
        let center = self.center();
        let (sx, sy) = self.scale();
        let view = Point::new(
            (f64::from(column.saturating_sub(self.area.x)) + 0.5) / sx,
            (f64::from(row.saturating_sub(self.area.y)) + 0.5) / sy,
        );
        let zoom = if self.zoom.abs() < f64::EPSILON { 1.0 } else { self.zoom };
        Point::new(
            (view.x - self.pan.x - center.x) / zoom + center.x,
            (view.y - self.pan.y - center.y) / zoom + center.y,
        )
    }

    /// Canvas distance covered by one cell, horizontally
    pub fn cell_width(&self) -> f64 {
        let (sx, _) = self.scale();
        1.0 / (sx * self.zoom).max(f64::EPSILON)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }
}

/// Cells on the straight line between two cells (Bresenham)
fn line_cells(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let step_x = if x < to.0 { 1 } else { -1 };
    let step_y = if y < to.1 { 1 } else { -1 };
    let mut error = dx + dy;
    let mut cells = Vec::new();

    loop {
        cells.push((x, y));
        if (x, y) == to {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
    cells
}

/// Whether the n-th cell of an edge is drawn for a style
fn style_draws(style: EdgeStyle, index: usize) -> bool {
    match style {
        EdgeStyle::Solid => true,
        EdgeStyle::Dashed => index % 2 == 0,
        EdgeStyle::Dotted => index % 3 == 0,
    }
}

/// Widget for rendering a knowledge graph in ratatui
pub struct GraphWidget<'a> {
    snapshot: &'a RenderSnapshot,
    canvas: CanvasBounds,
    colors: GraphColors,
    block: Option<Block<'a>>,
    show_legend: bool,
    /// Longest label drawn next to a node
    label_width: usize,
}

impl<'a> GraphWidget<'a> {
    pub fn new(snapshot: &'a RenderSnapshot, canvas: CanvasBounds) -> Self {
        Self {
            snapshot,
            canvas,
            colors: GraphColors::default(),
            block: None,
            show_legend: true,
            label_width: 16,
        }
    }

    pub fn colors(mut self, colors: GraphColors) -> Self {
        self.colors = colors;
        self
    }

    /// Set the block (border/title)
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    /// Area left for the graph once the block and legend are accounted for
    pub fn graph_area(&self, area: Rect) -> Rect {
        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        if self.show_legend && inner.height > 1 {
            Rect::new(inner.x, inner.y, inner.width, inner.height - 1)
        } else {
            inner
        }
    }

    /// Viewport for an area under the current zoom and pan
    pub fn viewport(&self, area: Rect) -> Viewport {
        let view = &self.snapshot.view_state;
        Viewport::new(self.graph_area(area), self.canvas, view.zoom, view.pan)
    }

    fn edge_style(&self, edge: &GraphEdge) -> Style {
        if self.snapshot.is_edge_dimmed(edge) {
            Style::default().fg(self.colors.dimmed)
        } else {
            Style::default().fg(self.colors.edge)
        }
    }

    fn render_edges(&self, viewport: &Viewport, buf: &mut Buffer) {
        for edge in &self.snapshot.edges {
            let source = self.snapshot.node(&edge.source_node_id);
            let target = self.snapshot.node(&edge.target_node_id);
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            let (Some(from), Some(to)) = (viewport.project(source.position), viewport.project(target.position)) else {
                continue;
            };

            let style = self.edge_style(edge);
            let cells = line_cells(
                (i32::from(from.0), i32::from(from.1)),
                (i32::from(to.0), i32::from(to.1)),
            );
            // Endpoints belong to the nodes
            let inner = cells.len().saturating_sub(1);
            for (i, &(x, y)) in cells.iter().enumerate().take(inner).skip(1) {
                if !style_draws(edge.style, i) || x < 0 || y < 0 {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                    cell.set_char('·').set_style(style);
                }
            }
        }
    }

    fn render_nodes(&self, viewport: &Viewport, buf: &mut Buffer) {
        let right_edge = viewport.area.x + viewport.area.width;
        for node in &self.snapshot.nodes {
            let Some((x, y)) = viewport.project(node.position) else {
                continue;
            };

            let mut style = Style::default().fg(self.colors.for_kind(node.kind));
            if self.snapshot.is_dimmed(&node.id) {
                style = Style::default().fg(self.colors.dimmed);
            } else if self.snapshot.is_highlighted(&node.id) {
                style = style.add_modifier(Modifier::BOLD);
            }
            if self.snapshot.selected_node_id() == Some(node.id.as_str()) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if self.snapshot.view_state.dragged_node_id() == Some(node.id.as_str()) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }

            let label: String = node.label.chars().take(self.label_width).collect();
            let text = format!("{} {}", node.kind.icon(), label);
            let available = usize::from(right_edge.saturating_sub(x));
            buf.set_stringn(x, y, text, available, style);
        }
    }

    fn legend_line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for kind in NodeKind::all() {
            let enabled = self.snapshot.view_state.type_filters.contains(kind);
            let color = if enabled {
                self.colors.for_kind(*kind)
            } else {
                self.colors.dimmed
            };
            spans.push(Span::styled(format!("{} {}", kind.icon(), kind), Style::default().fg(color)));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("zoom {:.1}x", self.snapshot.view_state.zoom),
            Style::default().fg(self.colors.legend),
        ));
        Line::from(spans)
    }

    fn render_empty_state(&self, area: Rect, buf: &mut Buffer) {
        let top = area.y + area.height.saturating_sub(2) / 2;
        let message_area = Rect::new(area.x, top, area.width, area.height.saturating_sub(top - area.y));
        let lines = vec![
            Line::from(Span::styled(
                "Nothing to show",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(EMPTY_STATE_MESSAGE, Style::default().fg(self.colors.legend))),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message_area, buf);
    }
}

impl Widget for GraphWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Handle block
        let inner_area = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if self.snapshot.is_empty() {
            self.render_empty_state(inner_area, buf);
            return;
        }

        let viewport = self.viewport(area);
        self.render_edges(&viewport, buf);
        self.render_nodes(&viewport, buf);

        if self.show_legend && inner_area.height > 1 {
            let legend_area = Rect::new(inner_area.x, inner_area.y + inner_area.height - 1, inner_area.width, 1);
            Paragraph::new(self.legend_line()).render(legend_area, buf);
        }
    }
}

/// Compact status bar for the graph view
pub struct GraphStatusBar<'a> {
    snapshot: &'a RenderSnapshot,
    colors: GraphColors,
}

impl<'a> GraphStatusBar<'a> {
    pub fn new(snapshot: &'a RenderSnapshot) -> Self {
        Self {
            snapshot,
            colors: GraphColors::default(),
        }
    }

    pub fn colors(mut self, colors: GraphColors) -> Self {
        self.colors = colors;
        self
    }
}

impl Widget for GraphStatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = &self.snapshot.view_state;
        let mut spans = vec![
            Span::styled("Nodes ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}/{}", self.snapshot.nodes.len(), self.snapshot.total_nodes),
                Style::default().fg(Color::White),
            ),
            Span::styled(" | Edges ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.snapshot.edges.len().to_string(), Style::default().fg(Color::White)),
        ];

        if view.has_search() {
            spans.push(Span::styled(" | Search ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                format!("\"{}\" ({})", view.search_term, self.snapshot.search_matches.len()),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(selected) = self.snapshot.selected_node_id() {
            let label = self
                .snapshot
                .node(selected)
                .map(|n| n.label.clone())
                .unwrap_or_else(|| selected.to_string());
            spans.push(Span::styled(" | Selected ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                format!("{} ({} connected)", label, self.snapshot.connected_node_ids.len()),
                Style::default().fg(self.colors.insight),
            ));
        }
        if view.is_dragging() {
            spans.push(Span::styled(" | dragging", Style::default().fg(Color::Yellow)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
