// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical keys. The terminal runs with
// VMIN=0 / VTIME=1, so every read either returns one byte or times out
// after ~100ms with nothing. That timeout is the whole escape-ambiguity
// story: a lone ESC followed by silence is the Escape key, an ESC followed
// by `[` and a final byte is an editing key.
//
// The decoder is a tiny state machine over a `ByteSource`:
//
//   ESC ─┬─ '[' ─┬─ 'A'..'D' 'H' 'F'      → arrows / Home / End
//        │       └─ digit ── '~'          → Home/Insert/Delete/End/PgUp/PgDn
//        ├─ 'O' ─── 'H' 'F'               → Home / End
//        └─ (timeout or anything else)    → ESC
//
// Anything incomplete or unrecognized degrades to a literal ESC byte.

use std::io::{self, Read};

// ─── Keys ───────────────────────────────────────────────────────────────────

/// The escape byte.
pub const ESC: u8 = 0x1b;

/// Carriage return, which is what Enter sends in raw mode.
pub const ENTER: u8 = b'\r';

/// The byte a terminal sends for `Ctrl` + `key`.
///
/// Ctrl strips bits 5 and 6, so `ctrl(b'q')` is `0x11`.
#[inline]
#[must_use]
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

/// A decoded keypress.
///
/// Plain bytes (printable characters, control characters, Enter, Escape)
/// arrive as [`Char`](Key::Char). Editing and navigation keys that the
/// terminal encodes as escape sequences get their own variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single byte, including control bytes such as `ctrl(b'q')`.
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Insert,
    /// The DEL byte (127), which most terminals send for Backspace.
    Backspace,
}

impl Key {
    /// Whether this key is a printable ASCII character.
    #[must_use]
    pub const fn is_printable(self) -> bool {
        matches!(self, Self::Char(b) if b >= 0x20 && b < 0x7f)
    }
}

// ─── Byte sources ───────────────────────────────────────────────────────────

/// Something the decoder can pull bytes from.
///
/// `Ok(None)` means the read timed out with no data — not an error.
pub trait ByteSource {
    /// Read one byte, or `None` if the read timed out.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than a timeout or an interrupted read.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Raw-mode stdin.
///
/// With VMIN=0 / VTIME=1 a `read` returns 0 bytes after the timeout, which
/// we surface as `None`. `EAGAIN` (some platforms report the timeout that
/// way) and `EINTR` (SIGWINCH arriving mid-read) are treated the same.
#[derive(Debug, Default)]
pub struct Stdin;

impl ByteSource for Stdin {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// In-memory source for tests and replays. Running dry reads as a timeout.
impl ByteSource for std::collections::VecDeque<u8> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Read one key, or `None` if the first read timed out.
///
/// This is the polling entry point: the event loop uses the `None` case to
/// run its periodic tick (clock, cursor blink) between keystrokes.
///
/// # Errors
///
/// Propagates read errors from the source.
pub fn poll_key(src: &mut impl ByteSource) -> io::Result<Option<Key>> {
    let Some(byte) = src.read_byte()? else {
        return Ok(None);
    };

    let key = match byte {
        ESC => decode_escape(src)?,
        0x7f => Key::Backspace,
        b => Key::Char(b),
    };
    Ok(Some(key))
}

/// Block until one key is available.
///
/// # Errors
///
/// Propagates read errors from the source.
pub fn read_key(src: &mut impl ByteSource) -> io::Result<Key> {
    loop {
        if let Some(key) = poll_key(src)? {
            return Ok(key);
        }
    }
}

/// Decode the rest of an escape sequence after the leading ESC.
fn decode_escape(src: &mut impl ByteSource) -> io::Result<Key> {
    const LONE_ESC: Key = Key::Char(ESC);

    let Some(first) = src.read_byte()? else {
        return Ok(LONE_ESC);
    };
    let Some(second) = src.read_byte()? else {
        return Ok(LONE_ESC);
    };

    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => {
            if src.read_byte()? != Some(b'~') {
                return Ok(LONE_ESC);
            }
            match digit {
                b'1' | b'7' => Key::Home,
                b'2' => Key::Insert,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => LONE_ESC,
            }
        }
        (b'[', b'A') => Key::ArrowUp,
        (b'[', b'B') => Key::ArrowDown,
        (b'[', b'C') => Key::ArrowRight,
        (b'[', b'D') => Key::ArrowLeft,
        (b'[' | b'O', b'H') => Key::Home,
        (b'[' | b'O', b'F') => Key::End,
        _ => LONE_ESC,
    };

    if key == LONE_ESC {
        tracing::trace!(target: "terminal", first, second, "unrecognized escape sequence");
    }
    Ok(key)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
