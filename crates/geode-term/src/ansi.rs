// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — the render engine decides that. This
// module only knows the byte-level encoding of every VT100 command geode
// sends.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: usize, y: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Move the cursor to the top-left corner.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Push the cursor as far right and down as the terminal allows.
///
/// CUF/CUD stop at the screen edge, so 999 of each lands in the
/// bottom-right cell regardless of the real size.
#[inline]
pub fn cursor_to_bottom_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C\x1b[999B")
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The reply arrives on stdin as `ESC [ rows ; cols R`.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Erase from the cursor to the end of the line (EL 0).
#[inline]
pub fn erase_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

/// Swap foreground and background (SGR 7).
#[inline]
pub fn inverse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground color from a raw SGR code (30–37, 90–97).
#[inline]
pub fn fg(w: &mut impl Write, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{code}m")
}

/// Restore the terminal's default foreground color (SGR 39).
#[inline]
pub fn fg_default(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[39m")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
///
/// The alternate screen preserves the original terminal content. On exit,
/// the original content comes back untouched.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_is_row_then_column() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_home_sequence() {
        assert_eq!(emit(|w| cursor_home(w)), "\x1b[H");
    }

    #[test]
    fn cursor_visibility_sequences() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn size_probe_sequences() {
        assert_eq!(emit(|w| cursor_to_bottom_right(w)), "\x1b[999C\x1b[999B");
        assert_eq!(emit(|w| request_cursor_position(w)), "\x1b[6n");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn screen_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| erase_line(w)), "\x1b[K");
        assert_eq!(emit(|w| reset(w)), "\x1b[m");
        assert_eq!(emit(|w| inverse(w)), "\x1b[7m");
    }

    // ── Color ───────────────────────────────────────────────────────────

    #[test]
    fn fg_writes_raw_code() {
        assert_eq!(emit(|w| fg(w, 31)), "\x1b[31m");
        assert_eq!(emit(|w| fg(w, 91)), "\x1b[91m");
    }

    #[test]
    fn fg_default_sequence() {
        assert_eq!(emit(|w| fg_default(w)), "\x1b[39m");
    }

    // ── Alternate screen ────────────────────────────────────────────────

    #[test]
    fn alt_screen_sequences() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }
}
