//! Editor options — the tunables with their defaults.
//!
//! There is no configuration file: the binary runs with
//! [`Options::default()`], and tests build variants with struct update
//! syntax.
//!
//! | Option               | Default | Effect                                        |
//! |----------------------|---------|-----------------------------------------------|
//! | `tab_stop`           | 2       | Tabs render to the next multiple of this      |
//! | `quit_confirmations` | 1       | Extra Ctrl-Q presses needed with unsaved work |
//! | `message_timeout`    | 5 s     | How long a status message stays visible       |
//! | `blink_interval`     | 500 ms  | Idle time between cursor blink toggles        |

use std::time::Duration;

/// Editor-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Tab stop width in render columns (minimum 1).
    pub tab_stop: usize,
    /// Extra quit presses required while the document is dirty.
    pub quit_confirmations: usize,
    /// Display lifetime of a status message.
    pub message_timeout: Duration,
    /// Idle time between cursor blink toggles.
    pub blink_interval: Duration,
}

impl Options {
    /// Tab stop clamped to at least 1.
    #[inline]
    #[must_use]
    pub fn tab_stop(&self) -> usize {
        self.tab_stop.max(1)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_stop: 2,
            quit_confirmations: 1,
            message_timeout: Duration::from_secs(5),
            blink_interval: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.tab_stop, 2);
        assert_eq!(o.quit_confirmations, 1);
        assert_eq!(o.message_timeout, Duration::from_secs(5));
        assert_eq!(o.blink_interval, Duration::from_millis(500));
    }

    #[test]
    fn zero_tab_stop_is_clamped() {
        let o = Options {
            tab_stop: 0,
            ..Options::default()
        };
        assert_eq!(o.tab_stop(), 1);
    }
}
