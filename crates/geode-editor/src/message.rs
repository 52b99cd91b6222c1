//! Transient status message shown in the message bar.

use std::time::{Duration, Instant};

/// A message and the moment it was set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            set_at: None,
        }
    }

    /// Replace the message, stamping it with the current time.
    pub fn set(&mut self, text: impl Into<String>) {
        self.set_at_instant(text, Instant::now());
    }

    /// Replace the message with an explicit timestamp.
    pub fn set_at_instant(&mut self, text: impl Into<String>, at: Instant) {
        self.text = text.into();
        self.set_at = Some(at);
        tracing::debug!(target: "editor", message = %self.text, "status message");
    }

    /// The raw text, regardless of age.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text if it is younger than `timeout` at `now`.
    #[must_use]
    pub fn visible(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let set_at = self.set_at?;
        (!self.text.is_empty() && now.saturating_duration_since(set_at) < timeout)
            .then_some(self.text.as_str())
    }
}
