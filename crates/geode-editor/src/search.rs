//! Search — incremental plain-substring search with match highlighting.
//!
//! A [`SearchState`] lives for one search prompt. After every key the
//! prompt accepts, the controller calls [`SearchState::update`] with the
//! current query and that key:
//!
//! 1. any match overlay from the previous step is removed
//! 2. Enter / Escape reset the direction state and stop
//! 3. Right / Down search forward from the last match, Left / Up backward;
//!    any other key (the query changed) restarts forward from the top
//! 4. rows are tried in order, wrapping around the document, against each
//!    row's render string; the first hit moves the cursor there, puts that
//!    row at the top of the screen, and overlays the match
//!
//! [`SearchState::finish`] ends the session. A cancelled search puts the
//! cursor and viewport back where they were when it began.

use geode_term::input::{Key, ENTER, ESC};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::highlight::Highlight;
use crate::view::Viewport;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// State carried between keystrokes of one search prompt.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Row of the last match, if any.
    last_match: Option<usize>,
    direction: SearchDirection,
    /// Row and highlight to put back before the next step.
    saved_highlight: Option<(usize, Vec<Highlight>)>,
    /// Cursor before the search began (for cancel).
    origin_cursor: Cursor,
    /// Viewport before the search began (for cancel).
    origin_view: Viewport,
}

impl SearchState {
    /// Start a session, remembering where the cursor and viewport were.
    #[must_use]
    pub const fn begin(cursor: Cursor, view: Viewport) -> Self {
        Self {
            last_match: None,
            direction: SearchDirection::Forward,
            saved_highlight: None,
            origin_cursor: cursor,
            origin_view: view,
        }
    }

    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    #[inline]
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// React to one prompt key with the query as it stands after that key.
    pub fn update(
        &mut self,
        query: &[u8],
        key: Key,
        doc: &mut Document,
        cursor: &mut Cursor,
        view: &mut Viewport,
    ) {
        self.clear_overlay(doc);

        match key {
            Key::Char(ENTER | ESC) => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = SearchDirection::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = SearchDirection::Backward,
            _ => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }
        if query.is_empty() || doc.is_empty() {
            return;
        }

        let rows = doc.len();
        let mut current = self.last_match;
        for _ in 0..rows {
            let at = match (current, self.direction) {
                (None, _) => 0,
                (Some(c), SearchDirection::Forward) => (c + 1) % rows,
                (Some(c), SearchDirection::Backward) => c.checked_sub(1).unwrap_or(rows - 1),
            };
            current = Some(at);

            let Some(row) = doc.row(at) else { break };
            let Some(pos) = find_bytes(row.render(), query) else {
                continue;
            };

            self.last_match = Some(at);
            cursor.cy = at;
            cursor.cx = row.rx_to_cx(pos, doc.tab_stop());
            view.home_on_row(at);
            self.saved_highlight = doc
                .overlay_highlight(at, pos, query.len(), Highlight::Match)
                .map(|saved| (at, saved));
            tracing::debug!(target: "search", row = at, col = pos, "match");
            return;
        }
        tracing::debug!(target: "search", query = %String::from_utf8_lossy(query), "no match");
    }

    /// End the session. Any overlay is removed; a cancelled search also
    /// restores the cursor and viewport.
    pub fn finish(
        mut self,
        accepted: bool,
        doc: &mut Document,
        cursor: &mut Cursor,
        view: &mut Viewport,
    ) {
        self.clear_overlay(doc);
        if !accepted {
            *cursor = self.origin_cursor;
            *view = self.origin_view;
        }
    }

    fn clear_overlay(&mut self, doc: &mut Document) {
        if let Some((row, saved)) = self.saved_highlight.take() {
            doc.restore_highlight(row, saved);
        }
    }
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
#[must_use]
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::C;
    use pretty_assertions::assert_eq;

    struct Fixture {
        doc: Document,
        cursor: Cursor,
        view: Viewport,
        search: SearchState,
        query: Vec<u8>,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let mut doc = Document::from_bytes(text.as_bytes(), 4);
            doc.set_language(Some(&C));
            let cursor = Cursor::new();
            let view = Viewport::new(10, 80);
            Self {
                doc,
                cursor,
                view,
                search: SearchState::begin(cursor, view),
                query: Vec::new(),
            }
        }

        fn type_query(&mut self, text: &str) {
            for &b in text.as_bytes() {
                self.query.push(b);
                self.key(Key::Char(b));
            }
        }

        fn key(&mut self, key: Key) {
            self.search
                .update(&self.query, key, &mut self.doc, &mut self.cursor, &mut self.view);
        }

        fn highlight(&self, row: usize) -> Vec<Highlight> {
            self.doc.row(row).unwrap().highlight().to_vec()
        }
    }

    // -- find_bytes -----------------------------------------------------------

    #[test]
    fn find_bytes_basics() {
        assert_eq!(find_bytes(b"hello world", b"world"), Some(6));
        assert_eq!(find_bytes(b"hello", b"xyz"), None);
        assert_eq!(find_bytes(b"ab", b"abc"), None);
        assert_eq!(find_bytes(b"aaa", b"aa"), Some(0));
    }

    // -- Incremental search ---------------------------------------------------

    #[test]
    fn first_match_moves_cursor_and_homes_view() {
        let mut f = Fixture::new("int a;\nint foo;\nfoo();\n");
        f.type_query("foo");
        assert_eq!((f.cursor.cx, f.cursor.cy), (4, 1));
        assert_eq!(f.view.dy, 1);
        assert_eq!(f.search.last_match(), Some(1));
    }

    #[test]
    fn match_is_overlaid_and_restored() {
        let mut f = Fixture::new("x\nint foo;\n");
        let before = f.highlight(1);
        f.type_query("foo");
        assert_eq!(&f.highlight(1)[4..7], &[Highlight::Match; 3]);
        f.key(Key::Char(ESC));
        assert_eq!(f.highlight(1), before);
    }

    #[test]
    fn arrows_step_forward_and_back_with_wrap() {
        let mut f = Fixture::new("foo\nbar\nfoo\n");
        f.type_query("foo");
        assert_eq!(f.cursor.cy, 0);
        f.key(Key::ArrowDown);
        assert_eq!(f.cursor.cy, 2);
        f.key(Key::ArrowRight);
        assert_eq!(f.cursor.cy, 0);
        f.key(Key::ArrowUp);
        assert_eq!(f.cursor.cy, 2);
        assert_eq!(f.search.direction(), SearchDirection::Backward);
    }

    #[test]
    fn only_one_row_is_overlaid_at_a_time() {
        let mut f = Fixture::new("foo\nfoo\n");
        let clean = f.highlight(0);
        f.type_query("foo");
        f.key(Key::ArrowDown);
        assert_eq!(f.highlight(0), clean);
        assert_eq!(&f.highlight(1)[..3], &[Highlight::Match; 3]);
    }

    #[test]
    fn match_column_is_translated_through_tabs() {
        let mut f = Fixture::new("\tfoo\n");
        f.type_query("foo");
        assert_eq!(f.cursor.cx, 1);
    }

    #[test]
    fn no_match_leaves_cursor() {
        let mut f = Fixture::new("abc\n");
        f.type_query("zz");
        assert_eq!((f.cursor.cx, f.cursor.cy), (0, 0));
        assert_eq!(f.search.last_match(), None);
    }

    #[test]
    fn backward_without_previous_match_searches_forward() {
        let mut f = Fixture::new("a\nfoo\n");
        f.query = b"foo".to_vec();
        f.key(Key::ArrowUp);
        assert_eq!(f.cursor.cy, 1);
        assert_eq!(f.search.direction(), SearchDirection::Forward);
    }

    // -- Finish ---------------------------------------------------------------

    #[test]
    fn cancel_restores_cursor_and_viewport() {
        let mut f = Fixture::new("a\nb\nfoo\n");
        f.cursor = Cursor { cx: 1, cy: 0, rx: 1 };
        f.search = SearchState::begin(f.cursor, f.view);
        f.type_query("foo");
        assert_eq!(f.cursor.cy, 2);
        f.key(Key::Char(ESC));
        f.search
            .clone()
            .finish(false, &mut f.doc, &mut f.cursor, &mut f.view);
        assert_eq!(f.cursor, Cursor { cx: 1, cy: 0, rx: 1 });
        assert_eq!(f.view.dy, 0);
    }

    #[test]
    fn accept_keeps_cursor_and_clears_overlay() {
        let mut f = Fixture::new("a\nfoo\n");
        let clean = f.highlight(1);
        f.type_query("foo");
        f.search
            .clone()
            .finish(true, &mut f.doc, &mut f.cursor, &mut f.view);
        assert_eq!(f.cursor.cy, 1);
        assert_eq!(f.highlight(1), clean);
    }
}
