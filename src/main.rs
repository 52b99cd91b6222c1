// SPDX-License-Identifier: MIT
//
// geode — a small modeless terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   geode-term   → raw mode, key decoding, escape sequences, event loop
//   geode-editor → rows, highlighting, viewport, search, render engine
//
// The Editor controller (editor.rs) implements geode-term's App trait.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message / prompt line        │  ← 1 row
//   └──────────────────────────────┘
//
// Logging is off unless GEODE_LOG holds a filter (e.g. `GEODE_LOG=debug`);
// events then go to ./geode.log, never to the terminal.

mod editor;

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use geode_editor::options::Options;
use geode_term::event_loop::EventLoop;

use editor::Editor;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GEODE_LOG";

/// Log file written in the working directory.
const LOG_FILE: &str = "geode.log";

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install the file subscriber when `GEODE_LOG` is set.
fn init_logging() {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };
    let appender = tracing_appender::rolling::never(".", LOG_FILE);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init();
    if installed.is_ok() {
        tracing::info!(target: "editor", version = env!("CARGO_PKG_VERSION"), "logging started");
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> Result<()> {
    let options = Options::default();
    let mut editor = match env::args_os().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            Editor::open(&path, options)
                .with_context(|| format!("failed to open {}", path.display()))?
        }
        None => Editor::new(options),
    };

    let mut event_loop = EventLoop::new();
    event_loop
        .run(&mut editor)
        .context("terminal session failed")?;
    tracing::info!(target: "editor", "exit");
    Ok(())
}

fn main() {
    init_logging();

    // `run` drops the terminal handle (restoring the screen) before the
    // error is printed.
    if let Err(err) = run() {
        tracing::error!(target: "editor", error = %format!("{err:#}"), "fatal");
        eprintln!("geode: {err:#}");
        process::exit(1);
    }
}
