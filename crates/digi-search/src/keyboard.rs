//! Keyboard shortcuts of the search field.

use serde::{Deserialize, Serialize};

/// Physical key code that focuses the field together with Ctrl.
pub const FOCUS_CODE: &str = "KeyK";

/// Logical key names that blur the field.
pub const BLUR_KEYS: [&str; 2] = ["Escape", "Esc"];

/// Label shown next to the field.
pub const SHORTCUT_LABEL: &str = "Strg + K";

/// A keydown as reported by the browser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct KeyInput {
    /// `KeyboardEvent.key`, layout dependent.
    #[serde(default)]
    pub key: String,
    /// `KeyboardEvent.code`, physical key.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub ctrl: bool,
}

/// What a key press does to the search field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusAction {
    Focus,
    Blur,
}

/// Map a key press to a focus change.
///
/// Ctrl + `KeyK` focuses regardless of layout; `Escape` blurs. Anything
/// else is ignored. The caller suppresses the browser default whenever an
/// action is returned.
#[must_use]
pub fn handle_key(input: &KeyInput) -> Option<FocusAction> {
    if input.ctrl && input.code == FOCUS_CODE {
        Some(FocusAction::Focus)
    } else if BLUR_KEYS.contains(&input.key.as_str()) {
        Some(FocusAction::Blur)
    } else {
        None
    }
}
