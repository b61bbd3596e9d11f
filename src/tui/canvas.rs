//! Interactive canvas: pan, zoom, drag, and spatial keyboard navigation over
//! the laid-out document graph.
//!
//! Interaction is a small state machine per view session: idle → panning
//! (background drag) → idle, idle → dragging-node → idle; wheel zoom can fire
//! from any state and leaves it unchanged. All mutation happens on the event
//! loop thread; the backlink scanner is ticked between input polls.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

use crate::graph::backlinks::{BacklinkScanner, ScanStep};
use crate::graph::build::{build, BuildOptions};
use crate::graph::model::{adjacency, Adjacency, GraphResult};
use crate::layout::{self, Layout, LayoutParams, LEVEL_DX};
use crate::session::Session;
use crate::tui::input::{self, Action, Direction};
use crate::tui::render::{self, RenderData, ViewTransform};

const MIN_ZOOM: f32 = 0.4;
const MAX_ZOOM: f32 = 3.0;
const ZOOM_STEP: f32 = 1.1;
/// Click-to-click window for double-click detection.
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
/// Nodes whose x differs by less than this share a column for keyboard
/// navigation. A simplicity/accuracy trade-off: on heavily dragged layouts
/// the up/down axis can jump columns — known limitation, kept as designed.
const COLUMN_EPS: f32 = LEVEL_DX / 2.0;

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub focus: String,
    pub max_depth: usize,
    pub max_nodes: usize,
    pub show_external: bool,
    pub preview_chars: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            focus: String::new(),
            max_depth: crate::graph::build::DEFAULT_MAX_DEPTH,
            max_nodes: crate::graph::build::DEFAULT_MAX_NODES,
            show_external: true,
            preview_chars: 120,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeDrag {
    id: String,
    grab_dx: f32,
    grab_dy: f32,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct PanDrag {
    start_sx: f32,
    start_sy: f32,
    start_pan_x: f32,
    start_pan_y: f32,
}

enum DragMode {
    Idle,
    Node(NodeDrag),
    Panning(PanDrag),
}

pub struct AppState {
    session: Session,
    result: GraphResult,
    adjacency: Adjacency,
    layout: Layout,
    center: String,
    max_depth: usize,
    max_nodes: usize,
    show_external: bool,
    preview_chars: usize,
    canvas: Rect,
    pan_x: f32,
    pan_y: f32,
    zoom: f32,
    /// Manual node positions from dragging; survive depth/external toggles,
    /// cleared only when the center changes.
    overrides: HashMap<String, (f32, f32)>,
    focused: Option<String>,
    drag: DragMode,
    last_click: Option<(String, Instant)>,
    scanner: Option<BacklinkScanner>,
    scan_note: Option<String>,
    status_message: Option<String>,
    show_help: bool,
}

impl AppState {
    pub fn load(root: PathBuf, opts: &ViewOptions) -> Result<Self> {
        let mut session = Session::new(root);
        let build_opts = BuildOptions {
            max_depth: opts.max_depth,
            max_nodes: opts.max_nodes,
        };
        let result = build(&mut session, &opts.focus, &build_opts, |_| {})?;
        let adjacency = adjacency(&result.nodes, &result.edges);
        let scanner = BacklinkScanner::new(&result);

        let mut app = Self {
            session,
            result,
            adjacency,
            layout: Layout::default(),
            center: opts.focus.clone(),
            max_depth: opts.max_depth,
            max_nodes: opts.max_nodes,
            show_external: opts.show_external,
            preview_chars: opts.preview_chars,
            canvas: Rect::new(0, 0, 160, 48),
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
            overrides: HashMap::new(),
            focused: None,
            drag: DragMode::Idle,
            last_click: None,
            scanner: Some(scanner),
            scan_note: None,
            status_message: None,
            show_help: false,
        };
        app.relayout();
        // Pin the resolved center id so later recenters compare correctly.
        if let Some(center) = layout::resolve_center(&app.result.nodes, &app.center) {
            app.center = center.id.clone();
        }
        app.focused = Some(app.center.clone());
        app.reset_view();
        Ok(app)
    }

    fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            center: self.center.clone(),
            max_depth: self.max_depth,
            canvas_width: self.canvas.width as f32,
            canvas_height: self.canvas.height as f32,
            show_external: self.show_external,
            preview_chars: self.preview_chars,
        }
    }

    fn relayout(&mut self) {
        let mut laid = layout::layout(
            &self.result.nodes,
            &self.result.edges,
            &self.adjacency,
            &self.layout_params(),
        );
        for node in &mut laid.nodes {
            if let Some(&(x, y)) = self.overrides.get(&node.node.id) {
                node.x = x;
                node.y = y;
            }
        }
        self.layout = laid;
        // Drop focus if the focused node left the layout.
        if let Some(id) = &self.focused {
            if self.layout.node(id).is_none() {
                self.focused = Some(self.center.clone());
            }
        }
    }

    /// Reset pan and zoom so the whole diagram fits, never zooming past 1:1.
    fn reset_view(&mut self) {
        let bounds = self.layout.bounds;
        let (bw, bh) = (bounds.width(), bounds.height());
        self.zoom = if bw > 0.0 && bh > 0.0 {
            let fit = (self.canvas.width as f32 / bw).min(self.canvas.height as f32 / bh);
            fit.clamp(MIN_ZOOM, 1.0)
        } else {
            1.0
        };
        let mid_x = (bounds.min_x + bounds.max_x) / 2.0;
        let mid_y = (bounds.min_y + bounds.max_y) / 2.0;
        self.pan_x = self.canvas.width as f32 / 2.0 - mid_x * self.zoom;
        self.pan_y = self.canvas.height as f32 / 2.0 - mid_y * self.zoom;
    }

    fn transform(&self) -> ViewTransform {
        ViewTransform {
            pan_x: self.pan_x,
            pan_y: self.pan_y,
            zoom: self.zoom,
        }
    }

    /// Zoom by `factor` keeping the world point under `(sx, sy)` fixed on
    /// screen: the pan offset is rescaled around the anchor, not recentered.
    fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32) {
        let old = self.zoom;
        let new = (old * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new - old).abs() < f32::EPSILON {
            return;
        }
        let scale = new / old;
        self.pan_x = sx - (sx - self.pan_x) * scale;
        self.pan_y = sy - (sy - self.pan_y) * scale;
        self.zoom = new;
    }

    /// Last-to-first AABB hit test, so overlapping later-drawn nodes win.
    fn hit_test(&self, wx: f32, wy: f32) -> Option<&str> {
        self.layout
            .nodes
            .iter()
            .rev()
            .find(|n| n.contains(wx, wy))
            .map(|n| n.node.id.as_str())
    }

    fn recenter(&mut self, id: &str) {
        if self.center != id {
            self.center = id.to_string();
            self.overrides.clear();
        }
        self.relayout();
        self.focused = Some(self.center.clone());
        self.reset_view();
    }

    fn rebuild(&mut self) -> Result<()> {
        // One writer at a time: an in-flight scan must not mutate the node
        // set while a new build replaces it.
        if let Some(scanner) = &mut self.scanner {
            scanner.cancel();
        }
        self.scanner = None;
        // Re-read the focus file even if its mtime is stale on this
        // filesystem, and drop the derived reverse index so the fresh scan
        // picks up files added since the last walk.
        let center_abs = self.session.abs_path(&self.center);
        self.session.files_changed(&[center_abs]);
        let opts = BuildOptions {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        };
        self.result = build(&mut self.session, &self.center, &opts, |_| {})?;
        self.adjacency = adjacency(&self.result.nodes, &self.result.edges);
        self.scanner = Some(BacklinkScanner::new(&self.result));
        self.scan_note = None;
        self.relayout();
        Ok(())
    }

    /// Advance the backlink scan one cooperative slice, merging any flushed
    /// batch into the displayed graph.
    fn tick_scan(&mut self) {
        let Some(mut scanner) = self.scanner.take() else {
            return;
        };
        match scanner.tick(&mut self.session) {
            Some(ScanStep::Batch(updates)) => {
                for update in updates {
                    if !self.result.contains(&update.node.id) {
                        self.result.nodes.push(update.node);
                    }
                    for edge in update.edges {
                        if !self.result.edges.contains(&edge) {
                            self.result.edges.push(edge);
                        }
                    }
                }
                self.adjacency = adjacency(&self.result.nodes, &self.result.edges);
                self.relayout();
                self.scanner = Some(scanner);
            }
            Some(ScanStep::Progress { scanned, total }) => {
                self.scan_note = Some(format!("scanning for backlinks {scanned}/{total}"));
                self.scanner = Some(scanner);
            }
            Some(ScanStep::Done) => {
                self.scan_note = Some("backlink scan complete".to_string());
            }
            None => {}
        }
    }

    // ---- keyboard spatial navigation -------------------------------------

    fn focused_pos(&self) -> Option<(f32, f32)> {
        let id = self.focused.as_ref()?;
        self.layout.node(id).map(|n| (n.x, n.y))
    }

    /// Same-column traversal: candidates share an x within COLUMN_EPS and
    /// the nearest one in the requested direction wins.
    fn nav_vertical(&self, up: bool) -> Option<String> {
        let (fx, fy) = self.focused_pos()?;
        let focused = self.focused.as_deref()?;
        self.layout
            .nodes
            .iter()
            .filter(|n| n.node.id != focused && (n.x - fx).abs() <= COLUMN_EPS)
            .filter(|n| if up { n.y < fy } else { n.y > fy })
            .min_by(|a, b| {
                (a.y - fy)
                    .abs()
                    .partial_cmp(&(b.y - fy).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|n| n.node.id.clone())
    }

    /// Horizontal moves pick, among nodes strictly to one side, the minimum
    /// by (column-distance, vertical-distance) — column first keeps arrow
    /// movement visually coherent instead of nearest-by-Euclidean jumps.
    fn nav_horizontal(&self, left: bool) -> Option<String> {
        let (fx, fy) = self.focused_pos()?;
        let focused = self.focused.as_deref()?;
        self.layout
            .nodes
            .iter()
            .filter(|n| n.node.id != focused)
            .filter(|n| if left { n.x < fx - COLUMN_EPS } else { n.x > fx + COLUMN_EPS })
            .min_by(|a, b| {
                let col_a = ((a.x - fx).abs() / LEVEL_DX).round() as i64;
                let col_b = ((b.x - fx).abs() / LEVEL_DX).round() as i64;
                col_a
                    .cmp(&col_b)
                    .then_with(|| (a.y - fy).abs().total_cmp(&(b.y - fy).abs()))
            })
            .map(|n| n.node.id.clone())
    }

    fn move_focus(&mut self, dir: Direction) {
        let next = match dir {
            Direction::Up => self.nav_vertical(true),
            Direction::Down => self.nav_vertical(false),
            Direction::Left => self.nav_horizontal(true),
            Direction::Right => self.nav_horizontal(false),
        };
        if let Some(id) = next {
            self.focused = Some(id);
        }
    }

    // ---- activation ------------------------------------------------------

    fn activate_focused(&mut self) -> Result<()> {
        let Some(id) = self.focused.clone() else {
            return Ok(());
        };
        let Some(node) = self.layout.node(&id) else {
            return Ok(());
        };
        if node.node.is_document() {
            self.recenter(&id);
        } else if let Some(ext) = node.node.as_external() {
            if let Some(url) = ext.urls.first() {
                open_url(url);
                self.status_message = Some(format!("opened {url}"));
            }
        }
        Ok(())
    }

    fn open_preview(&mut self) {
        let Some(id) = self.focused.clone() else {
            return;
        };
        let Some(node) = self.layout.node(&id) else {
            return;
        };
        if node.node.is_document() {
            let abs = self.session.abs_path(&id);
            open_editor(&abs);
            self.status_message = Some(format!("opened {id}"));
        }
    }

    // ---- event handling --------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.status_message = None;
        match input::action_for_key(key) {
            Action::Quit => return Ok(true),
            Action::Cancel => {
                if self.show_help {
                    self.show_help = false;
                } else if let Some(scanner) = &mut self.scanner {
                    scanner.cancel();
                    self.scan_note = Some("backlink scan cancelled".to_string());
                }
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Move(dir) => self.move_focus(dir),
            Action::Activate => self.activate_focused()?,
            Action::OpenPreview => self.open_preview(),
            Action::ToggleExternal => {
                self.show_external = !self.show_external;
                self.relayout();
            }
            Action::DepthIn => {
                self.max_depth = (self.max_depth + 1).min(8);
                self.rebuild()?;
            }
            Action::DepthOut => {
                if self.max_depth > 1 {
                    self.max_depth -= 1;
                    self.relayout();
                }
            }
            Action::ZoomIn => {
                let (cx, cy) = self.canvas_center();
                self.zoom_at(cx, cy, ZOOM_STEP);
            }
            Action::ZoomOut => {
                let (cx, cy) = self.canvas_center();
                self.zoom_at(cx, cy, 1.0 / ZOOM_STEP);
            }
            Action::Rebuild => {
                self.rebuild()?;
                self.status_message = Some("graph rebuilt".to_string());
            }
            Action::ResetView => self.reset_view(),
            Action::Noop => {}
        }
        Ok(false)
    }

    fn canvas_center(&self) -> (f32, f32) {
        (
            self.canvas.width as f32 / 2.0,
            self.canvas.height as f32 / 2.0,
        )
    }

    /// Mouse coordinates arrive terminal-absolute; translate into canvas
    /// space before use.
    fn canvas_pos(&self, column: u16, row: u16) -> (f32, f32) {
        (
            column as f32 - self.canvas.x as f32,
            row as f32 - self.canvas.y as f32,
        )
    }

    pub fn handle_mouse(&mut self, ev: MouseEvent) -> Result<()> {
        let (sx, sy) = self.canvas_pos(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (wx, wy) = self.transform().to_world(sx, sy);
                if let Some(id) = self.hit_test(wx, wy).map(str::to_string) {
                    if let Some(node) = self.layout.node(&id) {
                        let (grab_dx, grab_dy) = (wx - node.x, wy - node.y);
                        self.drag = DragMode::Node(NodeDrag {
                            id,
                            grab_dx,
                            grab_dy,
                            moved: false,
                        });
                    }
                } else {
                    self.drag = DragMode::Panning(PanDrag {
                        start_sx: sx,
                        start_sy: sy,
                        start_pan_x: self.pan_x,
                        start_pan_y: self.pan_y,
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match &mut self.drag {
                DragMode::Node(drag) => {
                    let drag = drag.clone();
                    let (wx, wy) = self.transform().to_world(sx, sy);
                    let pos = (wx - drag.grab_dx, wy - drag.grab_dy);
                    self.overrides.insert(drag.id.clone(), pos);
                    if let Some(node) = self.layout.nodes.iter_mut().find(|n| n.node.id == drag.id)
                    {
                        node.x = pos.0;
                        node.y = pos.1;
                    }
                    self.drag = DragMode::Node(NodeDrag {
                        moved: true,
                        ..drag
                    });
                }
                DragMode::Panning(pan) => {
                    self.pan_x = pan.start_pan_x + (sx - pan.start_sx);
                    self.pan_y = pan.start_pan_y + (sy - pan.start_sy);
                }
                DragMode::Idle => {}
            },
            MouseEventKind::Up(MouseButton::Left) => {
                if let DragMode::Node(drag) = &self.drag {
                    if !drag.moved {
                        let id = drag.id.clone();
                        self.click_node(&id);
                    } else {
                        // A real drag is not a click; forget the sequence.
                        self.last_click = None;
                    }
                }
                self.drag = DragMode::Idle;
            }
            MouseEventKind::ScrollUp => self.zoom_at(sx, sy, ZOOM_STEP),
            MouseEventKind::ScrollDown => self.zoom_at(sx, sy, 1.0 / ZOOM_STEP),
            _ => {}
        }
        Ok(())
    }

    /// Click vs double-click: a second click on the same node id within the
    /// threshold recenters (documents only).
    fn click_node(&mut self, id: &str) {
        let now = Instant::now();
        let is_double = matches!(
            &self.last_click,
            Some((prev, at)) if prev == id && now.duration_since(*at) <= DOUBLE_CLICK
        );
        if is_double {
            self.last_click = None;
            let is_doc = self
                .layout
                .node(id)
                .map(|n| n.node.is_document())
                .unwrap_or(false);
            if is_doc {
                self.recenter(id);
            }
        } else {
            self.last_click = Some((id.to_string(), now));
            self.focused = Some(id.to_string());
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let canvas = render::canvas_area(frame.area());
        if canvas != self.canvas {
            self.canvas = canvas;
            self.relayout();
        }
        let data = RenderData {
            layout: &self.layout,
            transform: self.transform(),
            center: &self.center,
            focused: self.focused.as_deref(),
            loaded_documents: self.result.loaded_documents,
            total_documents: self.result.total_documents,
            has_more: self.result.has_more,
            scan_note: self.scan_note.as_deref(),
            message: self.status_message.as_deref(),
            show_help: self.show_help,
        };
        render::draw(frame, &data);
    }
}

fn open_url(url: &str) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";
    let _ = Command::new(opener).arg(url).spawn();
}

fn open_editor(path: &std::path::Path) {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let _ = Command::new(editor).arg(path).spawn();
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

pub fn run(root: PathBuf, opts: &ViewOptions) -> Result<()> {
    let mut app = AppState::load(root, opts)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(Duration::from_millis(100))? {
            // Idle slot: let the backlink scan make progress.
            app.tick_scan();
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key)? {
                    break;
                }
            }
            Event::Mouse(ev) => app.handle_mouse(ev)?,
            _ => {}
        }
    }

    Ok(())
}
