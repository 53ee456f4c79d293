//! Dynamic help text generation from keymaps.

use crate::app::Message;
use crate::keys::{JUMP_KEYS, Keymap, format_key};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for. Keys are joined with "/".
    messages: Vec<Message>,
    /// The label to show (e.g., "nav", "play", "quit").
    label: &'static str,
    /// Joins the keys: "/" for alternatives, "-" for a span of keys.
    separator: &'static str,
}

impl HelpItem {
    /// Create a help item for a single action.
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            label,
            separator: "/",
        }
    }

    /// Create a help item for paired actions (e.g., j/k for next/prev).
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            label,
            separator: "/",
        }
    }

    /// Create a help item for a run of keys, shown as `first-last`.
    pub fn range(first: Message, last: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, last],
            label,
            separator: "-",
        }
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some(format!("{}:{}", keys.join(self.separator), self.label))
    }

    /// Format this help item for overlay display.
    /// Returns (`keys_string`, label) or None if no keys are bound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            return None;
        }
        Some((keys.join(self.separator), self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    /// Items to show in expanded (full help) mode.
    pub expanded: Vec<HelpItem>,
    /// Items to show in compact (minimal) mode.
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    /// Format help text for the given mode.
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Help configuration for the feed view.
pub fn feed_help() -> HelpConfig {
    use Message::{
        JumpTo, Next, OpenMedia, Previous, Quit, Refresh, ToggleDebug, ToggleHelp, TogglePlay,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(Next, Previous, "nav"),
            HelpItem::new(TogglePlay, "play/pause"),
            HelpItem::range(JumpTo(0), JumpTo(JUMP_KEYS - 1), "jump"),
            HelpItem::new(OpenMedia, "open"),
            HelpItem::new(Refresh, "refresh"),
            HelpItem::new(ToggleDebug, "debug"),
            HelpItem::new(Quit, "quit"),
            HelpItem::new(ToggleHelp, "hide"),
        ],
        compact: vec![
            HelpItem::pair(Next, Previous, "nav"),
            HelpItem::new(TogglePlay, "play"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

/// Help items for the feed overlay.
pub fn feed_overlay_items() -> Vec<HelpItem> {
    use Message::{
        JumpTo, Next, OpenMedia, Previous, Quit, Refresh, ToggleDebug, ToggleHelp, TogglePlay,
    };
    vec![
        HelpItem::pair(Next, Previous, "next/previous video"),
        HelpItem::new(TogglePlay, "play/pause"),
        HelpItem::range(JumpTo(0), JumpTo(JUMP_KEYS - 1), "jump to video"),
        HelpItem::new(OpenMedia, "open in browser"),
        HelpItem::new(Refresh, "refresh feed"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
