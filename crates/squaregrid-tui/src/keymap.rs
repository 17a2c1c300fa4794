use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use squaregrid_core::config::KeymapConfig;
use squaregrid_core::grid::{MAX_COLUMNS, MIN_COLUMNS};
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to the "gg" sequence, if any
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();
        let mut pending_g_action = None;

        let mut add_binding = |key_str: &str, action: Action| {
            if key_str == "gg" {
                pending_g_action = Some(action);
                return;
            }

            if let Some(binding) = parse_key_binding(key_str) {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            } else {
                warn!("Invalid key binding: '{}', ignoring", key_str);
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.move_left, Action::MoveLeft);
        add_binding(&config.move_right, Action::MoveRight);
        add_binding(&config.move_up, Action::MoveUp);
        add_binding(&config.move_down, Action::MoveDown);
        add_binding(&config.toggle_select, Action::ToggleSelect);
        add_binding(&config.jump_to_top, Action::JumpToTop);
        add_binding(&config.jump_to_bottom, Action::JumpToBottom);
        add_binding(&config.columns_increase, Action::ColumnsIncrease);
        add_binding(&config.columns_decrease, Action::ColumnsDecrease);
        add_binding(&config.toggle_row_mode, Action::ToggleRowMode);
        add_binding(&config.clear_selection, Action::ClearSelection);
        add_binding(&config.help, Action::Help);

        // Ctrl+C always quits
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        // Alternatives that stay available whatever the config says
        let fallbacks = [
            (KeyCode::Left, Action::MoveLeft),
            (KeyCode::Right, Action::MoveRight),
            (KeyCode::Up, Action::MoveUp),
            (KeyCode::Down, Action::MoveDown),
            (KeyCode::Home, Action::JumpToTop),
            (KeyCode::End, Action::JumpToBottom),
            (KeyCode::Enter, Action::ToggleSelect),
            (KeyCode::PageUp, Action::ScrollLines(-10)),
            (KeyCode::PageDown, Action::ScrollLines(10)),
        ];
        for (code, action) in fallbacks {
            bindings.entry(KeyBinding::simple(code)).or_insert(action);
        }
        // Digits pick the column count directly, like the picker
        for columns in MIN_COLUMNS..=MAX_COLUMNS {
            if let Some(digit) = char::from_digit(columns as u32, 10) {
                bindings
                    .entry(KeyBinding::simple(KeyCode::Char(digit)))
                    .or_insert(Action::SetColumns(columns));
            }
        }

        Self {
            bindings,
            pending_g_action,
        }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Get the action for completed "gg" sequence
    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// Check if a single 'g' press should start a pending sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Parse Vim-style key notation into a [`KeyBinding`].
///
/// Accepts a single character ("j", "+", "G" for Shift+g), `<C-x>` / `<S-x>`
/// modifiers and named keys such as `<CR>`, `<Esc>`, `<Space>` or `<Home>`.
/// "gg" is recognised by [`Keymap`] itself.
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        return match inner.split_once('-') {
            Some(("C" | "c", key)) => parse_key_name(key).map(KeyBinding::ctrl),
            Some(("S" | "s", key)) => parse_key_name(key).map(KeyBinding::shift),
            _ => parse_key_name(inner).map(KeyBinding::simple),
        };
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(KeyBinding::shift(KeyCode::Char(c))),
        (Some(c), None) => Some(KeyBinding::simple(KeyCode::Char(c))),
        _ => None,
    }
}

/// Named key inside `<...>`, or a single character after a modifier
fn parse_key_name(name: &str) -> Option<KeyCode> {
    let code = match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" | "spc" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        lower => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}
