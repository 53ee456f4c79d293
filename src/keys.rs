use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::api::ContentSource;
use crate::app::{App, Message};

/// Number of items reachable from the dot indicator keys.
pub const JUMP_KEYS: usize = 5;

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| *code == event.code && event.modifiers.contains(*mods))
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else if mods.contains(KeyModifiers::ALT) {
        format!("M-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Global keybindings that work everywhere outside the help overlay.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
}

/// Keybindings for the help overlay popup.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
}

/// Feed view keybindings.
pub fn feed_keymap() -> Keymap {
    let keymap = Keymap::new()
        .bind(KeyCode::Char('j'), Message::Next)
        .bind(KeyCode::Down, Message::Next)
        .bind(KeyCode::PageDown, Message::Next)
        .bind(KeyCode::Char('k'), Message::Previous)
        .bind(KeyCode::Up, Message::Previous)
        .bind(KeyCode::PageUp, Message::Previous)
        .bind(KeyCode::Char(' '), Message::TogglePlay)
        .bind(KeyCode::Char('o'), Message::OpenMedia)
        .bind(KeyCode::Char('r'), Message::Refresh);

    (0..JUMP_KEYS).fold(keymap, |keymap, index| {
        let digit = char::from_digit(index as u32 + 1, 10).unwrap_or('1');
        keymap.bind(KeyCode::Char(digit), Message::JumpTo(index))
    })
}

pub fn handle_key<S: ContentSource>(key: KeyEvent, app: &App<S>) -> Option<Message> {
    // Some terminals report releases and repeats as separate events.
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if app.help_overlay {
        return help_overlay_keymap().get(&key);
    }

    global_keymap().extend(feed_keymap()).get(&key)
}

/// Mouse wheel scrolls continuously; a left-button press and release is a
/// swipe (or a tap when both land on the same row).
pub fn handle_mouse<S: ContentSource>(mouse: MouseEvent, app: &App<S>) -> Option<Message> {
    if app.help_overlay {
        return None;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Message::ScrollDown),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp),
        MouseEventKind::Down(MouseButton::Left) => Some(Message::DragStart(mouse.row)),
        MouseEventKind::Up(MouseButton::Left) => Some(Message::DragEnd(mouse.row)),
        _ => None,
    }
}
