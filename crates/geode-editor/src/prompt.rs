//! Prompt — a one-line input field drawn in the message bar.
//!
//! The prompt is driven one key at a time by the controller and reports
//! whether input is still in progress, was accepted, or was cancelled. It
//! knows nothing about what the input is for; save-as and search both sit
//! on top of it.

use geode_term::input::{ctrl, Key, ENTER, ESC};

/// Result of feeding one key to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEvent {
    /// Still editing.
    Pending,
    /// Enter with non-empty input.
    Accepted,
    /// Escape.
    Cancelled,
}

/// Label, typed input, and hint shown after the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    label: &'static str,
    hint: &'static str,
    input: Vec<u8>,
}

impl Prompt {
    #[must_use]
    pub const fn new(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            input: Vec::new(),
        }
    }

    /// The save-as prompt.
    #[must_use]
    pub const fn save_as() -> Self {
        Self::new("Save as: ", " (ESC to cancel)")
    }

    /// The search prompt.
    #[must_use]
    pub const fn search() -> Self {
        Self::new("Search: ", " (Use ESC/Arrows/Enter)")
    }

    #[must_use]
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// The message-bar line: label, input, hint.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{}{}{}",
            self.label,
            String::from_utf8_lossy(&self.input),
            self.hint
        )
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: Key) -> PromptEvent {
        match key {
            Key::Char(ESC) => PromptEvent::Cancelled,
            Key::Char(ENTER) if !self.input.is_empty() => PromptEvent::Accepted,
            Key::Delete | Key::Backspace => {
                self.input.pop();
                PromptEvent::Pending
            }
            Key::Char(c) if c == ctrl(b'h') => {
                self.input.pop();
                PromptEvent::Pending
            }
            Key::Char(c) if key.is_printable() => {
                self.input.push(c);
                PromptEvent::Pending
            }
            _ => PromptEvent::Pending,
        }
    }
}
