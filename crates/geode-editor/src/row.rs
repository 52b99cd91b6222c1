//! A single text row — raw bytes, their display form, and highlighting.
//!
//! `chars` is what the file holds. `render` is what the screen shows: the
//! same bytes with every tab expanded to spaces up to the next tab stop.
//! `highlight` has one entry per render byte. The three are kept in step by
//! the owning [`Document`](crate::document::Document); this type only
//! offers the primitives.
//!
//! Two column spaces exist per row: a *char index* (`cx`) into `chars` and
//! a *render column* (`rx`) into `render`. [`Row::cx_to_rx`] and
//! [`Row::rx_to_cx`] convert between them.

use crate::highlight::{self, Highlight};
use crate::language::Language;

/// One line of the document, without its terminating newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub(crate) index: usize,
    pub(crate) chars: Vec<u8>,
    pub(crate) render: Vec<u8>,
    pub(crate) highlight: Vec<Highlight>,
    /// A block comment is still open at the end of this row.
    pub(crate) open_comment: bool,
}

impl Row {
    /// Build a row at `index` from raw bytes. Highlighting starts as all
    /// normal; the document rehighlights after inserting.
    #[must_use]
    pub fn new(index: usize, chars: &[u8], tab_stop: usize) -> Self {
        let mut row = Self {
            index,
            chars: chars.to_vec(),
            ..Self::default()
        };
        row.update_render(tab_stop);
        row.highlight = vec![Highlight::Normal; row.render.len()];
        row
    }

    /// Position of this row in its document.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Raw bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Display bytes (tabs expanded).
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// One class per render byte.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    #[inline]
    #[must_use]
    pub const fn open_comment(&self) -> bool {
        self.open_comment
    }

    /// Number of raw bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    // -- Columns --------------------------------------------------------------

    /// Render column of char index `cx` (clamped to the row length).
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        self.chars[..cx.min(self.chars.len())]
            .iter()
            .fold(0, |rx, &c| advance(rx, c, tab_stop))
    }

    /// Char index whose render span covers column `rx`. Columns past the
    /// end map to the row length.
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let tab_stop = tab_stop.max(1);
        let mut cur = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            cur = advance(cur, c, tab_stop);
            if cur > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    // -- Derived state --------------------------------------------------------

    /// Recompute `render` from `chars`.
    pub(crate) fn update_render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        self.render.clear();
        for &c in &self.chars {
            if c == b'\t' {
                self.render.push(b' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(c);
            }
        }
    }

    /// Recompute `highlight` given the previous row's open-comment flag.
    /// Returns `true` if this row's own flag changed.
    pub(crate) fn rehighlight(&mut self, language: Option<&Language>, prev_open: bool) -> bool {
        let open = highlight::highlight_line(&self.render, language, prev_open, &mut self.highlight);
        let changed = open != self.open_comment;
        self.open_comment = open;
        changed
    }

    // -- Edits (render and highlight are refreshed by the caller) --------------

    pub(crate) fn insert_byte(&mut self, at: usize, c: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
    }

    /// Replace the byte at `at`, or append when `at` is the row length.
    pub(crate) fn overwrite_byte(&mut self, at: usize, c: u8) {
        match self.chars.get_mut(at) {
            Some(slot) => *slot = c,
            None => self.chars.push(c),
        }
    }

    pub(crate) fn remove_byte(&mut self, at: usize) -> Option<u8> {
        (at < self.chars.len()).then(|| self.chars.remove(at))
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
    }

    /// Cut the row at `at`, returning the tail.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        self.chars.split_off(at)
    }
}

#[inline]
const fn advance(rx: usize, c: u8, tab_stop: usize) -> usize {
    if c == b'\t' {
        rx + tab_stop - (rx % tab_stop)
    } else {
        rx + 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(text: &str, tab_stop: usize) -> Row {
        Row::new(0, text.as_bytes(), tab_stop)
    }

    // -- Rendering ------------------------------------------------------------

    #[test]
    fn new_row_is_all_normal_per_render_byte() {
        let r = row("a\tb", 4);
        assert_eq!(r.render(), b"a   b");
        assert_eq!(r.highlight(), &[Highlight::Normal; 5]);
        assert!(!r.open_comment());
    }

    #[test]
    fn plain_text_renders_verbatim() {
        assert_eq!(row("hello", 2).render(), b"hello");
    }

    #[test]
    fn tab_expands_to_next_stop() {
        assert_eq!(row("\tx", 2).render(), b"  x");
        assert_eq!(row("a\tx", 2).render(), b"a x");
        assert_eq!(row("ab\tx", 4).render(), b"ab  x");
        assert_eq!(row("abcd\tx", 4).render(), b"abcd    x");
    }

    #[test]
    fn tab_stop_of_one() {
        assert_eq!(row("\t\t", 1).render(), b"  ");
    }

    #[test]
    fn zero_tab_stop_behaves_as_one() {
        assert_eq!(row("\t", 0).render(), b" ");
        assert_eq!(row("\t", 0).cx_to_rx(1, 0), 1);
    }

    #[test]
    fn render_length_formula() {
        let tab_stop = 4;
        let r = row("a\tbc\t\td", tab_stop);
        let mut expected = 0;
        for &c in r.chars() {
            expected = if c == b'\t' {
                (expected / tab_stop + 1) * tab_stop
            } else {
                expected + 1
            };
        }
        assert_eq!(r.render().len(), expected);
    }

    // -- Column mapping -------------------------------------------------------

    #[test]
    fn cx_to_rx_without_tabs_is_identity() {
        let r = row("abc", 4);
        for cx in 0..=3 {
            assert_eq!(r.cx_to_rx(cx, 4), cx);
        }
    }

    #[test]
    fn cx_to_rx_accounts_for_tabs() {
        let r = row("a\tb", 4);
        assert_eq!(r.cx_to_rx(0, 4), 0);
        assert_eq!(r.cx_to_rx(1, 4), 1);
        assert_eq!(r.cx_to_rx(2, 4), 4);
        assert_eq!(r.cx_to_rx(3, 4), 5);
    }

    #[test]
    fn cx_to_rx_clamps_past_end() {
        assert_eq!(row("ab", 4).cx_to_rx(10, 4), 2);
    }

    #[test]
    fn rx_to_cx_inside_tab_maps_to_tab() {
        let r = row("a\tb", 4);
        assert_eq!(r.rx_to_cx(2, 4), 1);
        assert_eq!(r.rx_to_cx(3, 4), 1);
        assert_eq!(r.rx_to_cx(4, 4), 2);
    }

    #[test]
    fn rx_to_cx_past_end_is_row_length() {
        assert_eq!(row("a\tb", 4).rx_to_cx(99, 4), 3);
    }

    #[test]
    fn round_trip_for_every_char_index() {
        for text in ["", "abc", "\t", "a\tb\t\tc", "\t\tx\ty"] {
            for tab_stop in 1..=8 {
                let r = row(text, tab_stop);
                for cx in 0..=r.len() {
                    let rx = r.cx_to_rx(cx, tab_stop);
                    assert_eq!(r.rx_to_cx(rx, tab_stop), cx, "{text:?} ts={tab_stop} cx={cx}");
                }
            }
        }
    }

    // -- Edits ----------------------------------------------------------------

    #[test]
    fn insert_and_remove() {
        let mut r = row("ac", 2);
        r.insert_byte(1, b'b');
        assert_eq!(r.chars(), b"abc");
        assert_eq!(r.remove_byte(0), Some(b'a'));
        assert_eq!(r.remove_byte(5), None);
        assert_eq!(r.chars(), b"bc");
    }

    #[test]
    fn insert_past_end_appends() {
        let mut r = row("ab", 2);
        r.insert_byte(9, b'c');
        assert_eq!(r.chars(), b"abc");
    }

    #[test]
    fn overwrite_replaces_or_appends() {
        let mut r = row("ab", 2);
        r.overwrite_byte(0, b'x');
        r.overwrite_byte(2, b'y');
        assert_eq!(r.chars(), b"xby");
    }

    #[test]
    fn split_off_and_append() {
        let mut r = row("hello", 2);
        let tail = r.split_off(2);
        assert_eq!(r.chars(), b"he");
        assert_eq!(tail, b"llo");
        r.append(&tail);
        assert_eq!(r.chars(), b"hello");
    }

    #[test]
    fn rehighlight_reports_flag_change() {
        let mut r = row("/* open", 2);
        assert!(r.rehighlight(Some(&crate::language::C), false));
        assert!(r.open_comment());
        assert!(!r.rehighlight(Some(&crate::language::C), false));
        assert_eq!(r.highlight().len(), r.render().len());
    }
}
