// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the editor.
//
// One thread, one loop:
//
//   paint (if dirty) → one write() → poll one key (≤100ms) → dispatch
//                                        │
//                                        └─ timeout → on_tick
//
// The only suspension point is the key read, bounded by the termios
// VTIME timeout. Every mutation happens between one read and the next
// paint, so there is nothing to lock and nothing to cancel.
//
// # SIGWINCH Handling
//
// Terminal resize is detected via a SIGWINCH handler that sets an
// `AtomicBool`. The loop checks the flag each iteration, re-queries the
// size, and forces a repaint. A signal landing mid-read interrupts the
// read, which the input layer reports as a timeout.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::input::{self, ByteSource, Key};
use crate::output::OutputBuffer;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler. Checked each loop iteration.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler only stores to an atomic, which is async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`paint`](App::paint) if the previous
/// iteration changed anything, then either [`on_key`](App::on_key) or
/// [`on_tick`](App::on_tick), and [`on_resize`](App::on_resize) when the
/// window size changed.
pub trait App {
    /// Handle one decoded key. Return [`Action::Quit`] to exit.
    fn on_key(&mut self, key: Key) -> Action;

    /// The terminal was resized (also called once before the first paint).
    fn on_resize(&mut self, _size: Size) {}

    /// Called when a read timed out with no key.
    ///
    /// Return `true` if time-based state (cursor blink, clock, message
    /// expiry) changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Serialize the whole frame into `out`. The loop writes it with a
    /// single `write()` once this returns.
    fn paint(&mut self, out: &mut OutputBuffer);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal handle and the frame buffer. Call [`run`](Self::run)
/// to enter the loop — it returns when the application signals
/// [`Action::Quit`] or an unrecoverable I/O error occurs.
pub struct EventLoop {
    terminal: Terminal,
    out: OutputBuffer,
}

impl EventLoop {
    /// Create an event loop. Does not touch the terminal yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminal: Terminal::new(),
            out: OutputBuffer::new(),
        }
    }

    /// Run the event loop until the application returns [`Action::Quit`].
    ///
    /// Enters raw mode, installs the SIGWINCH handler, runs the loop, and
    /// restores the terminal on exit (even on error).
    ///
    /// # Errors
    ///
    /// Returns an error if entering raw mode, reading input, or writing a
    /// frame fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app, &mut input::Stdin);

        // Always clean up, even if the loop errored.
        let restored = self.terminal.leave();
        result.and(restored)
    }

    /// The inner loop, separated so cleanup runs regardless of outcome.
    fn run_inner(&mut self, app: &mut impl App, src: &mut impl ByteSource) -> io::Result<()> {
        app.on_resize(self.terminal.size());
        let mut dirty = true;

        loop {
            if dirty {
                app.paint(&mut self.out);
                self.out.flush_stdout()?;
                dirty = false;
            }

            match input::poll_key(src)? {
                Some(key) => {
                    if app.on_key(key) == Action::Quit {
                        tracing::debug!(target: "terminal", "quit requested");
                        return Ok(());
                    }
                    dirty = true;
                }
                None => dirty |= app.on_tick(),
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                tracing::debug!(target: "terminal", cols = size.cols, rows = size.rows, "resized");
                app.on_resize(size);
                dirty = true;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
