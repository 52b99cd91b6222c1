// SPDX-License-Identifier: MIT
//
// geode-term — Terminal layer for geode.
//
// Raw termios, VT100 escape sequences, and a key decoder, with no TUI
// framework in between. The editor core builds a whole frame into an
// `OutputBuffer` and this crate puts it on screen with one write.
//
// Modules, leaves first:
//
//   ansi        escape-sequence writers (pure functions over `impl Write`)
//   output      frame buffer + redundant-color suppression
//   input       byte source trait + escape-sequence → `Key` decoder
//   terminal    raw mode, window size, panic-safe restore
//   clock       local HH:MM for the status bar
//   event_loop  single-threaded paint / poll / dispatch loop

pub mod ansi;
pub mod clock;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod terminal;
