//! Cursor — a position in the document plus its render column.
//!
//! `cy` ranges over `0..=doc.len()`: the row one past the end is where the
//! next typed character creates a new row. `cx` is a char index into row
//! `cy` and is clamped to that row's length after every vertical move.
//! `rx` is the render column of `cx`, recomputed by [`Cursor::update_rx`]
//! before each scroll.

use crate::document::Document;

/// A single-step cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Cursor position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Char index in the current row.
    pub cx: usize,
    /// Current row (may equal the document length).
    pub cy: usize,
    /// Render column of `cx`.
    pub rx: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0, rx: 0 }
    }

    /// Move one step. Left at column 0 wraps to the end of the previous
    /// row; right at the end of a row wraps to the start of the next.
    pub fn step(&mut self, dir: Direction, doc: &Document) {
        let on_row = self.cy < doc.len();
        match dir {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = doc.row_len(self.cy);
                }
            }
            Direction::Right => {
                if on_row {
                    if self.cx < doc.row_len(self.cy) {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Direction::Up => self.cy = self.cy.saturating_sub(1),
            Direction::Down => {
                if self.cy < doc.len() {
                    self.cy += 1;
                }
            }
        }
        self.clamp_to_row(doc);
    }

    /// Column 0 of the current row.
    pub const fn home(&mut self) {
        self.cx = 0;
    }

    /// End of the current row.
    pub fn end(&mut self, doc: &Document) {
        self.cx = doc.row_len(self.cy);
    }

    /// Keep `cx` within the current row.
    pub fn clamp_to_row(&mut self, doc: &Document) {
        self.cy = self.cy.min(doc.len());
        self.cx = self.cx.min(doc.row_len(self.cy));
    }

    /// Recompute the render column from `cx`.
    pub fn update_rx(&mut self, doc: &Document) {
        self.rx = doc
            .row(self.cy)
            .map_or(0, |row| row.cx_to_rx(self.cx, doc.tab_stop()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::from_bytes(text.as_bytes(), 4)
    }

    fn at(cx: usize, cy: usize) -> Cursor {
        Cursor { cx, cy, rx: 0 }
    }

    #[test]
    fn left_wraps_to_previous_row_end() {
        let d = doc("abc\nde\n");
        let mut c = at(0, 1);
        c.step(Direction::Left, &d);
        assert_eq!((c.cx, c.cy), (3, 0));
    }

    #[test]
    fn left_at_origin_stays() {
        let d = doc("abc\n");
        let mut c = at(0, 0);
        c.step(Direction::Left, &d);
        assert_eq!((c.cx, c.cy), (0, 0));
    }

    #[test]
    fn right_wraps_to_next_row_start() {
        let d = doc("ab\ncd\n");
        let mut c = at(2, 0);
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn right_past_last_row_does_nothing() {
        let d = doc("ab\n");
        let mut c = at(0, 1);
        c.step(Direction::Right, &d);
        assert_eq!((c.cx, c.cy), (0, 1));
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let d = doc("a\nb\n");
        let mut c = at(0, 1);
        c.step(Direction::Down, &d);
        c.step(Direction::Down, &d);
        assert_eq!(c.cy, 2);
    }

    #[test]
    fn vertical_move_clamps_column() {
        let d = doc("long line\nab\n");
        let mut c = at(8, 0);
        c.step(Direction::Down, &d);
        assert_eq!((c.cx, c.cy), (2, 1));
        c.step(Direction::Down, &d);
        assert_eq!((c.cx, c.cy), (0, 2));
    }

    #[test]
    fn home_and_end() {
        let d = doc("hello\n");
        let mut c = at(2, 0);
        c.end(&d);
        assert_eq!(c.cx, 5);
        c.home();
        assert_eq!(c.cx, 0);
    }

    #[test]
    fn rx_follows_tabs() {
        let d = doc("\tx\n");
        let mut c = at(1, 0);
        c.update_rx(&d);
        assert_eq!(c.rx, 4);
        c.cy = 1;
        c.update_rx(&d);
        assert_eq!(c.rx, 0);
    }
}
