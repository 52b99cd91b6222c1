//! Document — the ordered rows of one file plus its dirty counter.
//!
//! Every edit goes through a method here so the derived row state (render
//! string, highlight classes, open-comment flag, row index) is refreshed in
//! the same call. After any public method returns:
//!
//! - `rows[i].index == i` for every row
//! - each row's `render` is its `chars` with tabs expanded
//! - each row's `highlight` has one entry per render byte and reflects the
//!   previous row's open-comment flag
//!
//! # Highlight cascade
//!
//! Changing a row can open or close a block comment, which changes how the
//! following rows highlight. [`Document::rehighlight_from`] walks forward
//! one row at a time and stops at the first row whose open-comment flag
//! comes out unchanged.
//!
//! # Dirty counter
//!
//! Each modifying primitive bumps the counter; loading and saving reset it
//! to zero. Only "zero vs non-zero" is meaningful.
//!
//! Out-of-range positions are ignored (and logged), never panics.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::highlight::Highlight;
use crate::language::Language;
use crate::row::Row;

/// Failure loading or saving a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    /// The underlying I/O error.
    #[must_use]
    pub const fn io_error(&self) -> &io::Error {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => source,
        }
    }
}

/// An editable text file held as rows of bytes.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    dirty: usize,
    language: Option<&'static Language>,
    tab_stop: usize,
}

impl Document {
    /// An empty, clean document with no language.
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            language: None,
            tab_stop: tab_stop.max(1),
        }
    }

    /// Build a clean document from file contents.
    ///
    /// Lines are split on `\n`; trailing `\r` bytes are stripped from each
    /// line. A final newline does not produce an extra empty row.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], tab_stop: usize) -> Self {
        let mut doc = Self::new(tab_stop);
        let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        if bytes.is_empty() || bytes.ends_with(b"\n") {
            lines.pop();
        }
        doc.rows = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let end = line.iter().rposition(|&b| b != b'\r').map_or(0, |p| p + 1);
                Row::new(i, &line[..end], doc.tab_stop)
            })
            .collect();
        doc.rehighlight_all();
        doc
    }

    /// Load `path`. A file that does not exist yet opens as an empty
    /// document so it can be created on first save.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] for any other read failure.
    pub fn open(path: &Path, tab_stop: usize) -> Result<Self, DocumentError> {
        match fs::read(path) {
            Ok(bytes) => {
                let doc = Self::from_bytes(&bytes, tab_stop);
                tracing::info!(
                    target: "editor",
                    path = %path.display(),
                    rows = doc.len(),
                    bytes = bytes.len(),
                    "opened"
                );
                Ok(doc)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(target: "editor", path = %path.display(), "new file");
                Ok(Self::new(tab_stop))
            }
            Err(source) => Err(DocumentError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write the document to `path` (created with mode 0644 if missing,
    /// truncated otherwise). Returns the number of bytes written and marks
    /// the document clean.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] if the file cannot be opened or
    /// written; the dirty counter is left untouched.
    pub fn save(&mut self, path: &Path) -> Result<usize, DocumentError> {
        let bytes = self.to_bytes();
        let wrap = |source: io::Error| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt as _;
            options.mode(0o644);
        }
        let mut file = options.open(path).map_err(wrap)?;
        file.write_all(&bytes).map_err(wrap)?;

        self.dirty = 0;
        tracing::info!(target: "editor", path = %path.display(), bytes = bytes.len(), "saved");
        Ok(bytes.len())
    }

    /// Every row's bytes followed by `\n`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_bytes());
        for row in &self.rows {
            out.extend_from_slice(&row.chars);
            out.push(b'\n');
        }
        out
    }

    /// Size of the serialized document.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.rows.iter().map(|r| r.len() + 1).sum()
    }

    // -- Queries --------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    #[inline]
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Row> {
        self.rows.iter()
    }

    /// Length of row `at`, or 0 past the end.
    #[inline]
    #[must_use]
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    #[inline]
    #[must_use]
    pub const fn language(&self) -> Option<&'static Language> {
        self.language
    }

    // -- Language -------------------------------------------------------------

    /// Switch language and rehighlight every row.
    pub fn set_language(&mut self, language: Option<&'static Language>) {
        self.language = language;
        tracing::debug!(
            target: "highlight",
            language = language.map_or("none", |l| l.name),
            "language selected"
        );
        self.rehighlight_all();
    }

    /// Pick the language for `filename` (or none) and rehighlight.
    pub fn select_language_for(&mut self, filename: &str) {
        self.set_language(Language::detect(filename));
    }

    // -- Row primitives -------------------------------------------------------

    /// Insert a row holding `text` before position `at` (`at == len`
    /// appends).
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        if at > self.rows.len() {
            tracing::warn!(target: "editor", at, len = self.rows.len(), "insert_row out of range");
            return;
        }
        let mut row = Row::new(at, text, self.tab_stop);
        // Start from the flag the displaced row used to see so the cascade
        // notices when the new row changes it.
        row.open_comment = at.checked_sub(1).is_some_and(|p| self.rows[p].open_comment);
        self.rows.insert(at, row);
        self.renumber(at + 1);
        self.rehighlight_from(at);
        self.dirty += 1;
    }

    /// Remove row `at`.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            tracing::warn!(target: "editor", at, len = self.rows.len(), "delete_row out of range");
            return;
        }
        self.rows.remove(at);
        self.renumber(at);
        if at < self.rows.len() {
            self.rehighlight_from(at);
        }
        self.dirty += 1;
    }

    /// Insert `c` at char index `at` of row `row`, or replace the byte there
    /// when `overwrite` is set. Overwriting at the end of the row appends.
    pub fn insert_char(&mut self, row: usize, at: usize, c: u8, overwrite: bool) {
        let Some(r) = self.rows.get_mut(row) else {
            tracing::warn!(target: "editor", row, "insert_char past last row");
            return;
        };
        if at > r.len() {
            tracing::warn!(target: "editor", row, at, len = r.len(), "insert_char past row end");
            return;
        }
        if overwrite {
            r.overwrite_byte(at, c);
        } else {
            r.insert_byte(at, c);
        }
        self.update_row(row);
        self.dirty += 1;
    }

    /// Remove the byte at char index `at` of row `row`.
    pub fn delete_char(&mut self, row: usize, at: usize) {
        let Some(r) = self.rows.get_mut(row) else {
            tracing::warn!(target: "editor", row, "delete_char past last row");
            return;
        };
        if r.remove_byte(at).is_none() {
            tracing::warn!(target: "editor", row, at, "delete_char past row end");
            return;
        }
        self.update_row(row);
        self.dirty += 1;
    }

    /// Append `bytes` to the end of row `row`.
    pub fn append_to_row(&mut self, row: usize, bytes: &[u8]) {
        let Some(r) = self.rows.get_mut(row) else {
            tracing::warn!(target: "editor", row, "append_to_row past last row");
            return;
        };
        r.append(bytes);
        self.update_row(row);
        self.dirty += 1;
    }

    /// Split row `row` at char index `at`; the tail becomes a new row below.
    pub fn split_line(&mut self, row: usize, at: usize) {
        let Some(r) = self.rows.get_mut(row) else {
            tracing::warn!(target: "editor", row, "split_line past last row");
            return;
        };
        let tail = r.split_off(at);
        self.insert_row(row + 1, &tail);
        self.update_row(row);
    }

    /// Join row `row` onto the end of the previous row. Returns the char
    /// index in the previous row where the joined text starts.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            tracing::warn!(target: "editor", row, "join_with_previous out of range");
            return None;
        }
        let joint = self.rows[row - 1].len();
        let moved = std::mem::take(&mut self.rows[row].chars);
        self.append_to_row(row - 1, &moved);
        self.delete_row(row);
        Some(joint)
    }

    // -- Search overlay -------------------------------------------------------

    /// Paint `len` render columns of row `row` starting at `start` with
    /// `class`. Returns the previous highlight so it can be restored; `None`
    /// if the row does not exist.
    pub fn overlay_highlight(
        &mut self,
        row: usize,
        start: usize,
        len: usize,
        class: Highlight,
    ) -> Option<Vec<Highlight>> {
        let r = self.rows.get_mut(row)?;
        let saved = r.highlight.clone();
        let start = start.min(r.highlight.len());
        let end = start.saturating_add(len).min(r.highlight.len());
        r.highlight[start..end].fill(class);
        Some(saved)
    }

    /// Put back a highlight saved by [`overlay_highlight`](Self::overlay_highlight).
    /// Ignored if the row is gone or its render length no longer matches.
    pub fn restore_highlight(&mut self, row: usize, saved: Vec<Highlight>) {
        match self.rows.get_mut(row) {
            Some(r) if r.render.len() == saved.len() => r.highlight = saved,
            _ => tracing::debug!(target: "search", row, "stale highlight not restored"),
        }
    }

    // -- Derived state --------------------------------------------------------

    /// Refresh render and highlight for `row` and cascade.
    fn update_row(&mut self, row: usize) {
        self.rows[row].update_render(self.tab_stop);
        self.rehighlight_from(row);
    }

    /// Rehighlight `start`, then each following row while the open-comment
    /// flag keeps changing.
    fn rehighlight_from(&mut self, start: usize) {
        let mut at = start;
        let mut visited = 0usize;
        while at < self.rows.len() {
            let prev_open = at.checked_sub(1).is_some_and(|p| self.rows[p].open_comment);
            let changed = self.rows[at].rehighlight(self.language, prev_open);
            visited += 1;
            if !changed {
                break;
            }
            at += 1;
        }
        if visited > 1 {
            tracing::trace!(target: "highlight", start, rows = visited, "comment cascade");
        }
    }

    fn rehighlight_all(&mut self) {
        let mut prev_open = false;
        for row in &mut self.rows {
            row.rehighlight(self.language, prev_open);
            prev_open = row.open_comment;
        }
    }

    fn renumber(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.index = i;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(crate::options::Options::default().tab_stop())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
