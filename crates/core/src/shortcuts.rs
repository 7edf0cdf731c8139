//! Keyboard shortcuts suppressed while an assessment is running.

/// Modifier state of a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Developer-tool and view-source shortcuts: F12, Ctrl+Shift+I, Ctrl+Shift+J, Ctrl+U.
///
/// `key` is the DOM `key` value; letters are matched case-insensitively.
#[must_use]
pub fn is_blocked_shortcut(key: &str, modifiers: KeyModifiers) -> bool {
    if key == "F12" {
        return true;
    }
    if !modifiers.ctrl {
        return false;
    }
    match key.to_ascii_lowercase().as_str() {
        "i" | "j" => modifiers.shift,
        "u" => true,
        _ => false,
    }
}
