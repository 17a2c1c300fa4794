use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use squaregrid_core::TileId;

use crate::app::{App, HitTarget, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Lines moved per mouse wheel notch
const WHEEL_LINES: i32 = 3;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ToggleSelect,          // focused tile
    ToggleTile(TileId),    // clicked tile
    JumpToTop,
    JumpToBottom,
    PendingG,              // first 'g' press, waiting for the second
    ColumnsIncrease,
    ColumnsDecrease,
    SetColumns(usize),
    ToggleRowMode,
    ClearSelection,
    ScrollLines(i32),
    Help,
    ExitMode,
    None,
}

impl From<HitTarget> for Action {
    fn from(target: HitTarget) -> Self {
        match target {
            HitTarget::Tile(id) => Action::ToggleTile(id),
            HitTarget::ScrollTop => Action::JumpToTop,
            HitTarget::ScrollBottom => Action::JumpToBottom,
            HitTarget::Columns(columns) => Action::SetColumns(columns),
        }
    }
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    // Any key closes the help overlay
    if app.mode == Mode::Help {
        return Action::ExitMode;
    }

    let binding = normalize(key);

    if keymap.is_g_prefix(&binding) {
        return if app.pending_key == Some('g') {
            keymap.get_pending_g_action().cloned().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    keymap.get(&binding).cloned().unwrap_or(Action::None)
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.mode == Mode::Help {
                return Action::ExitMode;
            }
            app.hit_test(mouse.column, mouse.row)
                .map(Action::from)
                .unwrap_or(Action::None)
        }
        MouseEventKind::ScrollDown => Action::ScrollLines(WHEEL_LINES),
        MouseEventKind::ScrollUp => Action::ScrollLines(-WHEEL_LINES),
        _ => Action::None,
    }
}

/// Terminals disagree on whether shifted symbols ('+', '?') carry SHIFT;
/// only letters keep it so "G" and "g" stay distinct.
fn normalize(key: KeyEvent) -> KeyBinding {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code {
        if !c.is_ascii_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    KeyBinding::new(key.code, modifiers)
}
