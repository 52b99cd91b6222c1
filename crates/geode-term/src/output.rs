// SPDX-License-Identifier: MIT
//
// Frame output.
//
//   OutputBuffer  one frame's bytes, handed to the terminal in one write()
//   ColorWriter   last foreground emitted; same-color runs cost one escape

use std::io::{self, Write};

use crate::ansi;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Bytes of the frame being built.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// An empty buffer (16 KB preallocated).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes pushed since the last flush.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Hand the frame to stdout in one write and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Like [`flush_stdout`](Self::flush_stdout) for any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── ColorWriter ─────────────────────────────────────────────────────────────

/// Foreground color tracker that skips redundant SGR sequences.
///
/// `None` means the terminal's default foreground. The tracker starts in
/// the default state, matching a line that was just reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorWriter {
    current: Option<u8>,
}

impl ColorWriter {
    /// Create a tracker in the default-foreground state.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Switch to `color`, writing an escape only if it differs from the
    /// last one emitted.
    pub fn set(&mut self, out: &mut OutputBuffer, color: Option<u8>) {
        if color == self.current {
            return;
        }
        // Writes into a Vec never fail.
        let _ = match color {
            Some(code) => ansi::fg(out, code),
            None => ansi::fg_default(out),
        };
        self.current = color;
    }

    /// Re-emit the tracked color unconditionally.
    ///
    /// Needed after an SGR reset (e.g. the end of a reverse-video glyph)
    /// wiped the terminal's color while our state still remembers it.
    pub fn reapply(&self, out: &mut OutputBuffer) {
        if let Some(code) = self.current {
            let _ = ansi::fg(out, code);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
