//! Render engine — one whole frame into one output buffer.
//!
//! A [`Frame`] borrows everything that appears on screen and serializes it
//! as escape sequences:
//!
//! ```text
//! hide cursor, home
//! text rows     document render slice [dx, dx+cols) with colors,
//!               `~` past the end, welcome banner on an empty document
//! status bar    inverse video, left and right parts, exactly `cols` wide
//! message bar   status message or prompt line
//! place cursor, show it if the blink flag is on
//! ```
//!
//! Every text row and the message bar end with erase-to-end-of-line so
//! nothing from the previous frame survives. Color escapes are emitted only
//! when the class changes between adjacent bytes.

use std::io;

use geode_term::ansi;
use geode_term::clock::format_clock;
use geode_term::output::{ColorWriter, OutputBuffer};

use crate::cursor::Cursor;
use crate::document::Document;
use crate::row::Row;
use crate::view::Viewport;

/// Longest filename prefix shown in the status bar.
const STATUS_NAME_WIDTH: usize = 20;

/// Everything one frame shows.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub doc: &'a Document,
    pub cursor: &'a Cursor,
    pub view: &'a Viewport,
    pub filename: Option<&'a str>,
    pub overwrite: bool,
    /// Message-bar text (already filtered by age), or the prompt line.
    pub message: Option<&'a str>,
    /// Local time for the status bar.
    pub clock: Option<(u8, u8)>,
    /// Cursor blink state.
    pub show_cursor: bool,
}

impl Frame<'_> {
    /// Serialize the frame into `out`.
    ///
    /// # Errors
    ///
    /// Propagates writer errors; an [`OutputBuffer`] never produces any.
    pub fn draw(&self, out: &mut OutputBuffer) -> io::Result<()> {
        ansi::cursor_hide(out)?;
        ansi::cursor_home(out)?;

        self.draw_rows(out)?;
        self.draw_status_bar(out)?;
        self.draw_message_bar(out)?;

        let x = self.cursor.rx.saturating_sub(self.view.dx);
        let y = self.cursor.cy.saturating_sub(self.view.dy);
        ansi::cursor_to(out, x, y)?;
        if self.show_cursor {
            ansi::cursor_show(out)?;
        }
        Ok(())
    }

    fn draw_rows(&self, out: &mut OutputBuffer) -> io::Result<()> {
        for y in 0..self.view.rows {
            match self.doc.row(self.view.dy + y) {
                Some(row) => draw_row(row, self.view.dx, self.view.cols, out)?,
                None if self.doc.is_empty() && y == self.view.rows / 3 => {
                    draw_welcome(self.view.cols, out);
                }
                None => out.push_byte(b'~'),
            }
            ansi::erase_line(out)?;
            out.push_bytes(b"\r\n");
        }
        Ok(())
    }

    fn draw_status_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let cols = self.view.cols;
        let name: String = self
            .filename
            .unwrap_or("[No Name]")
            .chars()
            .take(STATUS_NAME_WIDTH)
            .collect();
        let left = format!(
            "{name} - {} lines{}",
            self.doc.len(),
            if self.doc.is_dirty() { " (modified)" } else { "" }
        );
        let right = format!(
            "{} | {} | {}/{} | {} | {}",
            self.doc.language().map_or("no ft", |l| l.name),
            human_size(self.doc.size_bytes()),
            self.cursor.cy + 1,
            self.doc.len(),
            if self.overwrite { "OVR" } else { "INS" },
            self.clock.map_or_else(|| "--:--".to_owned(), format_clock),
        );

        ansi::inverse(out)?;
        let left = &left.as_bytes()[..left.len().min(cols)];
        out.push_bytes(left);
        let mut len = left.len();
        while len < cols {
            if cols - len == right.len() {
                out.push_bytes(right.as_bytes());
                break;
            }
            out.push_byte(b' ');
            len += 1;
        }
        ansi::reset(out)?;
        out.push_bytes(b"\r\n");
        Ok(())
    }

    fn draw_message_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        ansi::erase_line(out)?;
        if let Some(message) = self.message {
            let bytes = message.as_bytes();
            out.push_bytes(&bytes[..bytes.len().min(self.view.cols)]);
        }
        Ok(())
    }
}

/// One document row, clipped to `[dx, dx + cols)`.
fn draw_row(row: &Row, dx: usize, cols: usize, out: &mut OutputBuffer) -> io::Result<()> {
    let render = row.render();
    let start = dx.min(render.len());
    let end = dx.saturating_add(cols).min(render.len());

    let mut color = ColorWriter::new();
    for (&c, &class) in render[start..end].iter().zip(&row.highlight()[start..end]) {
        if c.is_ascii_control() {
            let glyph = if c <= 26 { b'@' + c } else { b'?' };
            ansi::inverse(out)?;
            out.push_byte(glyph);
            ansi::reset(out)?;
            color.reapply(out);
        } else {
            color.set(out, class.color());
            out.push_byte(c);
        }
    }
    color.set(out, None);
    Ok(())
}

fn draw_welcome(cols: usize, out: &mut OutputBuffer) {
    let welcome = format!("Geode editor -- version {}", env!("CARGO_PKG_VERSION"));
    let shown = welcome.len().min(cols);
    let mut padding = (cols - shown) / 2;
    if padding > 0 {
        out.push_byte(b'~');
        padding -= 1;
    }
    out.push_bytes(&b" ".repeat(padding));
    out.push_bytes(&welcome.as_bytes()[..shown]);
}

/// Human-readable byte count: `512B`, `1.5K`, `2.0M`, `1.1G`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: usize) -> String {
    const K: f64 = 1024.0;
    let b = bytes as f64;
    if b < K {
        format!("{bytes}B")
    } else if b < K * K {
        format!("{:.1}K", b / K)
    } else if b < K * K * K {
        format!("{:.1}M", b / (K * K))
    } else {
        format!("{:.1}G", b / (K * K * K))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
