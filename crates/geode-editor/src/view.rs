//! Viewport — which slice of the document is on screen.
//!
//! `dy` is the first visible row and `dx` the first visible render column.
//! `rows` counts text rows only; the status and message bars take the two
//! terminal rows below them.

use crate::cursor::Cursor;

/// Rows reserved below the text area.
pub const BAR_ROWS: usize = 2;

/// Scroll state and text-area size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub dx: usize,
    pub dy: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    /// A viewport for a terminal of `term_rows` x `term_cols`.
    #[must_use]
    pub const fn new(term_rows: usize, term_cols: usize) -> Self {
        Self {
            dx: 0,
            dy: 0,
            rows: term_rows.saturating_sub(BAR_ROWS),
            cols: term_cols,
        }
    }

    /// Adopt a new terminal size, keeping the scroll offsets.
    pub const fn resize(&mut self, term_rows: usize, term_cols: usize) {
        self.rows = term_rows.saturating_sub(BAR_ROWS);
        self.cols = term_cols;
    }

    /// Scroll the minimum amount that keeps the cursor on screen.
    /// `cursor.rx` must be current.
    pub fn scroll(&mut self, cursor: &Cursor) {
        let rows = self.rows.max(1);
        let cols = self.cols.max(1);
        if cursor.cy < self.dy {
            self.dy = cursor.cy;
        }
        if cursor.cy >= self.dy + rows {
            self.dy = cursor.cy + 1 - rows;
        }
        if cursor.rx < self.dx {
            self.dx = cursor.rx;
        }
        if cursor.rx >= self.dx + cols {
            self.dx = cursor.rx + 1 - cols;
        }
    }

    /// Put `row` at the top of the screen.
    pub const fn home_on_row(&mut self, row: usize) {
        self.dy = row;
    }

    /// Whether document row `row` is on screen.
    #[must_use]
    pub const fn shows_row(&self, row: usize) -> bool {
        row >= self.dy && row < self.dy + self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cursor(rx: usize, cy: usize) -> Cursor {
        Cursor { cx: rx, cy, rx }
    }

    #[test]
    fn new_reserves_bar_rows() {
        let v = Viewport::new(24, 80);
        assert_eq!((v.rows, v.cols), (22, 80));
        assert_eq!(Viewport::new(1, 10).rows, 0);
    }

    #[test]
    fn scroll_down_keeps_cursor_on_last_row() {
        let mut v = Viewport::new(12, 80);
        v.scroll(&cursor(0, 10));
        assert_eq!(v.dy, 1);
        assert!(v.shows_row(10));
    }

    #[test]
    fn scroll_up_to_cursor() {
        let mut v = Viewport {
            dy: 50,
            ..Viewport::new(24, 80)
        };
        v.scroll(&cursor(0, 3));
        assert_eq!(v.dy, 3);
    }

    #[test]
    fn horizontal_scroll() {
        let mut v = Viewport::new(24, 10);
        v.scroll(&cursor(15, 0));
        assert_eq!(v.dx, 6);
        v.scroll(&cursor(2, 0));
        assert_eq!(v.dx, 2);
    }

    #[test]
    fn no_scroll_when_visible() {
        let mut v = Viewport::new(24, 80);
        v.scroll(&cursor(5, 5));
        assert_eq!((v.dx, v.dy), (0, 0));
    }

    #[test]
    fn resize_keeps_offsets() {
        let mut v = Viewport {
            dy: 7,
            ..Viewport::new(24, 80)
        };
        v.resize(40, 100);
        assert_eq!((v.dy, v.rows, v.cols), (7, 38, 100));
    }

    #[test]
    fn home_on_row() {
        let mut v = Viewport::new(24, 80);
        v.home_on_row(42);
        assert_eq!(v.dy, 42);
        assert!(v.shows_row(42));
        assert!(!v.shows_row(41));
    }
}
