use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    /// Recenter on a document node, or open an external node's first URL.
    Activate,
    /// Open the focused document in the host file preview.
    OpenPreview,
    ToggleExternal,
    DepthIn,
    DepthOut,
    ZoomIn,
    ZoomOut,
    /// Rebuild the graph from the current center.
    Rebuild,
    ResetView,
    ToggleHelp,
    Quit,
    Cancel,
    Noop,
}

pub fn action_for_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Enter => Action::Activate,
        KeyCode::Char('o') => Action::OpenPreview,
        KeyCode::Char('e') => Action::ToggleExternal,
        KeyCode::Char(']') => Action::DepthIn,
        KeyCode::Char('[') => Action::DepthOut,
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') if key.modifiers.contains(KeyModifiers::SHIFT) => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('r') => Action::Rebuild,
        KeyCode::Char('0') => Action::ResetView,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::Cancel,
        _ => Action::Noop,
    }
}
