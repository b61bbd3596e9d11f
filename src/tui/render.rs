//! Canvas rendering: world-space layout to terminal cells.
//!
//! Edges are drawn first, then nodes in layout order, so later nodes paint
//! over earlier ones — the same order the hit test resolves in reverse.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout as RtLayout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;

use crate::layout::{LaidOutNode, Layout, Side};

/// Current pan/zoom transform. Screen = world * zoom + pan.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl ViewTransform {
    pub fn to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (wx * self.zoom + self.pan_x, wy * self.zoom + self.pan_y)
    }

    pub fn to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }
}

#[derive(Debug)]
pub struct RenderData<'a> {
    pub layout: &'a Layout,
    pub transform: ViewTransform,
    pub center: &'a str,
    pub focused: Option<&'a str>,
    pub loaded_documents: usize,
    pub total_documents: usize,
    pub has_more: bool,
    pub scan_note: Option<&'a str>,
    pub message: Option<&'a str>,
    pub show_help: bool,
}

/// The rectangle nodes are drawn into, needed by the canvas for hit testing.
pub fn canvas_area(frame_area: Rect) -> Rect {
    let area = frame_area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let block = chrome_block();
    let inner = block.inner(area);
    let [canvas, _gap, _status] = status_split(inner);
    canvas
}

fn chrome_block() -> Block<'static> {
    let title = Line::from(vec![
        Span::styled("docmap", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::new(1, 1, 0, 0))
        .title(title)
}

fn status_split(inner: Rect) -> [Rect; 3] {
    RtLayout::vertical([
        Constraint::Min(4),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(inner)
}

pub fn draw(frame: &mut Frame, data: &RenderData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    let block = chrome_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [canvas, _gap, status] = status_split(inner);

    draw_edges(frame.buffer_mut(), canvas, data);
    for node in &data.layout.nodes {
        let focused = data.focused == Some(node.node.id.as_str());
        draw_node(frame.buffer_mut(), canvas, data, node, focused);
    }

    draw_status(frame, status, data);

    if data.show_help {
        draw_help(frame);
    }
}

fn draw_edges(buf: &mut Buffer, area: Rect, data: &RenderData<'_>) {
    for edge in &data.layout.edges {
        let (Some(a), Some(b)) = (data.layout.node(&edge.source), data.layout.node(&edge.target))
        else {
            continue;
        };
        let (x0, y0) = data.transform.to_screen(a.x, a.y);
        let (x1, y1) = data.transform.to_screen(b.x, b.y);
        draw_line(buf, area, x0, y0, x1, y1);
    }
}

/// Step along the segment writing dim dots; nodes are painted over it later.
fn draw_line(buf: &mut Buffer, area: Rect, x0: f32, y0: f32, x1: f32, y1: f32) {
    let steps = ((x1 - x0).abs().max((y1 - y0).abs()) as usize).max(1);
    let style = Style::default().fg(Color::DarkGray);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        put(buf, area, x, y, '·', style);
    }
}

fn put(buf: &mut Buffer, area: Rect, x: f32, y: f32, ch: char, style: Style) {
    let cx = area.x as i32 + x.round() as i32;
    let cy = area.y as i32 + y.round() as i32;
    if cx < area.x as i32
        || cy < area.y as i32
        || cx >= (area.x + area.width) as i32
        || cy >= (area.y + area.height) as i32
    {
        return;
    }
    buf[(cx as u16, cy as u16)].set_char(ch).set_style(style);
}

fn draw_node(buf: &mut Buffer, area: Rect, data: &RenderData<'_>, node: &LaidOutNode, focused: bool) {
    let t = data.transform;
    let (sx, sy) = t.to_screen(node.x - node.width / 2.0, node.y - node.height / 2.0);
    let w = ((node.width * t.zoom).round() as i32).max(3);
    let h = ((node.height * t.zoom).round() as i32).max(1);
    let left = sx.round() as i32;
    let top = sy.round() as i32;

    let border = node_style(node, focused, data.center);
    if h < 3 || w < 6 {
        // Too small for a box at this zoom: compact marker plus label.
        let label = truncate(node.node.label(), w.max(8) as usize);
        put(buf, area, sx, sy, '▪', border);
        for (i, ch) in label.chars().enumerate() {
            put(buf, area, sx + 2.0 + i as f32, sy, ch, border);
        }
        return;
    }

    draw_box(buf, area, left, top, w, h, border);

    let inner_w = (w - 4).max(1) as usize;
    let title = truncate(node.node.label(), inner_w);
    let title_style = border.add_modifier(Modifier::BOLD);
    for (i, ch) in title.chars().enumerate() {
        put(buf, area, (left + 2 + i as i32) as f32, (top + 1) as f32, ch, title_style);
    }

    if let Some(doc) = node.node.as_document() {
        let dim = Style::default().fg(Color::DarkGray);
        if let Some(preview) = &doc.preview {
            let mut chars = preview.chars();
            for row in 2..(h - 1) {
                for col in 0..inner_w {
                    match chars.next() {
                        Some(ch) => put(
                            buf,
                            area,
                            (left + 2 + col as i32) as f32,
                            (top + row) as f32,
                            ch,
                            dim,
                        ),
                        None => break,
                    }
                }
            }
        }
        if doc.large {
            // Flag prefix-parsed files; links may be missing.
            put(buf, area, (left + w - 3) as f32, top as f32, '!', Style::default().fg(Color::Yellow));
        }
        if !doc.broken_links.is_empty() {
            put(buf, area, (left + 1) as f32, top as f32, '✗', Style::default().fg(Color::Red));
        }
    } else if let Some(ext) = node.node.as_external() {
        let count = format!("{}↗", ext.link_count);
        let dim = Style::default().fg(Color::DarkGray);
        for (i, ch) in count.chars().enumerate() {
            put(buf, area, (left + 2 + i as i32) as f32, (top + h - 1) as f32, ch, dim);
        }
    }
}

fn node_style(node: &LaidOutNode, focused: bool, center: &str) -> Style {
    if focused {
        return Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    if node.node.id == center {
        return Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    }
    match node.side {
        Side::External => Style::default().fg(Color::Magenta),
        _ => Style::default().fg(Color::White),
    }
}

fn draw_box(buf: &mut Buffer, area: Rect, left: i32, top: i32, w: i32, h: i32, style: Style) {
    let right = left + w - 1;
    let bottom = top + h - 1;
    for x in (left + 1)..right {
        put(buf, area, x as f32, top as f32, '─', style);
        put(buf, area, x as f32, bottom as f32, '─', style);
    }
    for y in (top + 1)..bottom {
        put(buf, area, left as f32, y as f32, '│', style);
        put(buf, area, right as f32, y as f32, '│', style);
    }
    put(buf, area, left as f32, top as f32, '┌', style);
    put(buf, area, right as f32, top as f32, '┐', style);
    put(buf, area, left as f32, bottom as f32, '└', style);
    put(buf, area, right as f32, bottom as f32, '┘', style);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else if max <= 1 {
        "…".to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

fn draw_status(frame: &mut Frame, area: Rect, data: &RenderData<'_>) {
    let more = if data.has_more { "+" } else { "" };
    let mut lines = vec![Line::from(vec![
        Span::styled("center ", Style::default().fg(Color::DarkGray)),
        Span::styled(data.center, Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled(
            format!("{}/{}{} documents", data.loaded_documents, data.total_documents, more),
            Style::default().fg(Color::White),
        ),
    ])];

    lines.push(Line::from(Span::styled(
        "[enter] recenter/open  [o] preview  [e] externals  [[/]] depth  [+/-] zoom  [r] rebuild",
        Style::default().fg(Color::DarkGray),
    )));

    let note = data.message.or(data.scan_note).unwrap_or("");
    lines.push(Line::from(Span::styled(
        note.to_string(),
        Style::default().fg(Color::Green),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 52, 40);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled(
            "docmap keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("arrows / hjkl   move focus between nodes"),
        Line::from("enter           recenter on document / open URL"),
        Line::from("o               open focused document in preview"),
        Line::from("e               toggle external-link cluster"),
        Line::from("[ ]             decrease / increase depth limit"),
        Line::from("+ -             zoom (mouse wheel zooms at cursor)"),
        Line::from("0               reset pan and zoom"),
        Line::from("r               rebuild graph from current center"),
        Line::from("mouse drag      pan canvas, or move a node"),
        Line::from("double-click    recenter on clicked document"),
        Line::from("q               quit"),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(base: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = RtLayout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(base);
    let [area] = RtLayout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    area
}
