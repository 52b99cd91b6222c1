// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window size, and RAII cleanup.
//
// Safety: `unsafe` wraps the POSIX calls only (tcgetattr, tcsetattr,
// ioctl TIOCGWINSZ, isatty, raw fd writes).
#![allow(unsafe_code)]
//
// Raw mode here means: no echo, no canonical line buffering, no signals
// from Ctrl-C / Ctrl-Z, no flow control, no output post-processing, and
// a 100ms read timeout (VMIN=0, VTIME=1) so the event loop can tick
// between keystrokes.
//
// The original termios is restored on every exit path: `Drop` on the
// handle for normal returns and `?` errors, and a process-wide panic hook
// for panics. The hook bypasses Rust's stdout lock and writes a pre-built
// restore sequence straight to fd 1.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::input::{ByteSource, ESC};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Window size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Fallback used before the real size is known (and off-TTY).
    pub const DEFAULT: Self = Self { cols: 80, rows: 24 };
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// The driver's idea of the window size (`ioctl(TIOCGWINSZ)`).
///
/// Returns `None` if stdout is not a terminal or the driver reports zeros.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a TTY.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Parse a cursor position report: `ESC [ rows ; cols R`.
///
/// The trailing `R` is optional so callers can pass the bytes read up to
/// (but not including) the terminator.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(&[ESC, b'['])?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let size = Size {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    };
    (size.rows > 0 && size.cols > 0).then_some(size)
}

/// Upper bound on a cursor report's length. `ESC[65535;65535R` is 15 bytes.
const MAX_REPORT_LEN: usize = 32;

/// Measure the terminal by parking the cursor in the bottom-right corner
/// and asking where it ended up.
///
/// Used when `TIOCGWINSZ` is unavailable. Requires raw mode, otherwise the
/// reply sits in the line discipline until the user presses Enter.
///
/// # Errors
///
/// Returns an error if the query cannot be written, the reply cannot be
/// read, or the reply does not parse.
pub fn query_size_via_cursor(src: &mut impl ByteSource, out: &mut impl Write) -> io::Result<Size> {
    ansi::cursor_to_bottom_right(out)?;
    ansi::request_cursor_position(out)?;
    out.flush()?;

    let mut report = Vec::with_capacity(MAX_REPORT_LEN);
    while report.len() < MAX_REPORT_LEN {
        match src.read_byte()? {
            Some(b'R') | None => break,
            Some(byte) => report.push(byte),
        }
    }

    parse_cursor_report(&report)
        .ok_or_else(|| io::Error::other("terminal did not report its cursor position"))
}

/// The terminal size: the driver's answer if it has one, otherwise the
/// cursor-report fallback.
///
/// # Errors
///
/// Returns an error if both methods fail.
pub fn window_size(src: &mut impl ByteSource, out: &mut impl Write) -> io::Result<Size> {
    if let Some(size) = get_size() {
        return Ok(size);
    }
    tracing::debug!(target: "terminal", "TIOCGWINSZ unavailable, probing with cursor report");
    query_size_via_cursor(src, out)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Saved termios the panic hook restores. Set while raw mode is on.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put back the saved termios, if any. Errors are ignored.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Written by the panic hook: SGR reset, show cursor, leave the alternate
/// screen (last, so the shell's screen comes back clean).
const EMERGENCY_RESTORE: &[u8] = b"\x1b[m\x1b[?25h\x1b[?1049l";

/// The hook is installed once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Chain a panic hook that restores the screen and termios before the
/// previous hook prints the panic message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owner of the raw-mode session.
///
/// Call [`enter`](Self::enter) to switch to raw mode on the alternate
/// screen. The terminal is restored when the handle is dropped — even on
/// panic.
///
/// # Example
///
/// ```no_run
/// use geode_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... render frames, handle input ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Termios to put back on `leave`.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether we're in raw mode on the alternate screen.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle. Does **not** touch the terminal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            size: get_size().unwrap_or(Size::DEFAULT),
            active: false,
        }
    }

    /// Current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the driver after a SIGWINCH.
    ///
    /// Keeps the previous size if the driver has no answer.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Enter raw mode on the alternate screen and measure the window.
    ///
    /// Off a TTY (tests, pipes) raw mode and the size probe are skipped.
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if termios configuration, terminal output, or the
    /// window-size query fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;
        self.active = true;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        lock.flush()?;

        if is_tty() {
            self.size = window_size(&mut crate::input::Stdin, &mut lock)?;
        }
        tracing::info!(target: "terminal", cols = self.size.cols, rows = self.size.rows, "raw mode entered");
        Ok(())
    }

    /// Leave raw mode and restore the user's screen.
    ///
    /// Idempotent: calling `leave()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        ansi::exit_alt_screen(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        tracing::info!(target: "terminal", "terminal restored");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_cflag |= libc::CS8;
            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
            termios.c_oflag &= !libc::OPOST;

            // VMIN=0, VTIME=1: read() returns after one byte or 100ms.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
