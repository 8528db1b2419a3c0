//! Focus state for the shortcut dispatcher.

/// Where keystrokes are routed.
///
/// While the label input holds focus, digits and arrows belong to the text
/// field; treating this as an explicit state (rather than peeking at the DOM
/// on every key event) keeps the dispatcher testable off the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFocus {
    /// Shortcuts active
    #[default]
    Idle,
    /// Label text input focused; shortcuts suppressed
    TextEntry,
}

impl InputFocus {
    /// Transition to `TextEntry` (input gained focus).
    pub fn focus(&mut self) {
        *self = InputFocus::TextEntry;
    }

    /// Transition back to `Idle` (input blurred or submitted).
    pub fn blur(&mut self) {
        *self = InputFocus::Idle;
    }

    /// Whether keystrokes currently belong to the text input.
    pub fn is_text_entry(self) -> bool {
        self == InputFocus::TextEntry
    }
}
