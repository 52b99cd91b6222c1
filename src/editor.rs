// SPDX-License-Identifier: MIT
//
// Editor controller — key bindings and the glue between the editor core
// and the event loop.
//
// `Editor` implements geode-term's `App` trait. Each key flows through:
//
//   on_key → prompt open? → prompt (+ search) handling
//                   └ no  → binding dispatch → document/cursor mutation
//   paint  → scroll → render::Frame → OutputBuffer → one write()
//
// States: normal, prompting (save-as or search), and quit-pending, which
// is just a positive confirmation counter that any non-quit key re-arms.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Instant;

use geode_editor::cursor::{Cursor, Direction};
use geode_editor::document::{Document, DocumentError};
use geode_editor::message::StatusMessage;
use geode_editor::options::Options;
use geode_editor::prompt::{Prompt, PromptEvent};
use geode_editor::render::Frame;
use geode_editor::search::SearchState;
use geode_editor::view::Viewport;

use geode_term::clock;
use geode_term::event_loop::{Action, App};
use geode_term::input::{ctrl, Key, ENTER, ESC};
use geode_term::output::OutputBuffer;
use geode_term::terminal::Size;

pub const HELP_MESSAGE: &str = "Help: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

const QUIT: u8 = ctrl(b'q');
const SAVE: u8 = ctrl(b's');
const FIND: u8 = ctrl(b'f');
const BACKSPACE: u8 = ctrl(b'h');
const REFRESH: u8 = ctrl(b'l');

// ─── Prompt state ───────────────────────────────────────────────────────────

/// The prompt currently occupying the message bar.
#[derive(Debug)]
enum ActivePrompt {
    SaveAs(Prompt),
    Search(Prompt, SearchState),
}

impl ActivePrompt {
    const fn prompt(&self) -> &Prompt {
        match self {
            Self::SaveAs(p) | Self::Search(p, _) => p,
        }
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The whole editor state.
#[derive(Debug)]
pub struct Editor {
    doc: Document,
    cursor: Cursor,
    view: Viewport,
    filename: Option<PathBuf>,
    overwrite: bool,
    message: StatusMessage,
    /// Quit presses still required while the document is dirty.
    quit_times: usize,
    prompt: Option<ActivePrompt>,
    options: Options,

    cursor_visible: bool,
    last_blink: Instant,
    /// What the last frame showed, so ticks know when to repaint.
    painted_clock: Option<(u8, u8)>,
    painted_message: bool,
}

impl Editor {
    /// An editor on an empty, unnamed document.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_document(Document::new(options.tab_stop()), None, options)
    }

    /// An editor on `path`. A missing file opens empty and is created on
    /// first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>, options: Options) -> Result<Self, DocumentError> {
        let path = path.into();
        let mut doc = Document::open(&path, options.tab_stop())?;
        doc.select_language_for(&path.to_string_lossy());
        Ok(Self::with_document(doc, Some(path), options))
    }

    fn with_document(doc: Document, filename: Option<PathBuf>, options: Options) -> Self {
        let mut message = StatusMessage::new();
        message.set(HELP_MESSAGE);
        let size = Size::DEFAULT;
        Self {
            doc,
            cursor: Cursor::new(),
            view: Viewport::new(usize::from(size.rows), usize::from(size.cols)),
            filename,
            overwrite: false,
            message,
            quit_times: options.quit_confirmations,
            prompt: None,
            options,
            cursor_visible: true,
            last_blink: Instant::now(),
            painted_clock: None,
            painted_message: false,
        }
    }

    // ── Key dispatch ───────────────────────────────────────────────────────

    fn process_key(&mut self, key: Key) -> Action {
        match key {
            Key::Char(QUIT) => {
                if self.doc.is_dirty() && self.quit_times > 0 {
                    self.message.set(format!(
                        "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Action::Continue;
                }
                return Action::Quit;
            }
            Key::Char(ENTER) => self.insert_newline(),
            Key::Char(SAVE) => self.save(),
            Key::Char(FIND) => self.start_find(),
            Key::Char(BACKSPACE) | Key::Backspace => self.delete_char(),
            Key::Delete => {
                self.cursor.step(Direction::Right, &self.doc);
                self.delete_char();
            }
            Key::Insert => {
                self.overwrite = !self.overwrite;
                tracing::debug!(target: "editor", overwrite = self.overwrite, "mode toggled");
            }
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.doc),
            Key::PageUp => self.page(Direction::Up),
            Key::PageDown => self.page(Direction::Down),
            Key::ArrowUp => self.cursor.step(Direction::Up, &self.doc),
            Key::ArrowDown => self.cursor.step(Direction::Down, &self.doc),
            Key::ArrowLeft => self.cursor.step(Direction::Left, &self.doc),
            Key::ArrowRight => self.cursor.step(Direction::Right, &self.doc),
            Key::Char(REFRESH | ESC) => {}
            Key::Char(c) if key.is_printable() || c == b'\t' => self.insert_char(c),
            Key::Char(c) => tracing::trace!(target: "editor", byte = c, "unbound control byte"),
        }
        self.quit_times = self.options.quit_confirmations;
        Action::Continue
    }

    fn page(&mut self, dir: Direction) {
        self.cursor.cy = match dir {
            Direction::Up => self.view.dy,
            _ => (self.view.dy + self.view.rows)
                .saturating_sub(1)
                .min(self.doc.len()),
        };
        self.cursor.clamp_to_row(&self.doc);
        for _ in 0..self.view.rows {
            self.cursor.step(dir, &self.doc);
        }
    }

    // ── Editing ────────────────────────────────────────────────────────────

    fn insert_char(&mut self, c: u8) {
        if self.cursor.cy == self.doc.len() {
            self.doc.insert_row(self.doc.len(), b"");
        }
        self.doc
            .insert_char(self.cursor.cy, self.cursor.cx, c, self.overwrite);
        self.cursor.cx += 1;
    }

    fn insert_newline(&mut self) {
        if self.cursor.cx == 0 {
            self.doc.insert_row(self.cursor.cy, b"");
        } else {
            self.doc.split_line(self.cursor.cy, self.cursor.cx);
        }
        self.cursor.cy += 1;
        self.cursor.cx = 0;
    }

    fn delete_char(&mut self) {
        let Cursor { cx, cy, .. } = self.cursor;
        if cy == self.doc.len() || (cx == 0 && cy == 0) {
            return;
        }
        if cx > 0 {
            self.doc.delete_char(cy, cx - 1);
            self.cursor.cx -= 1;
        } else if let Some(joint) = self.doc.join_with_previous(cy) {
            self.cursor.cx = joint;
            self.cursor.cy -= 1;
        }
    }

    // ── Save ───────────────────────────────────────────────────────────────

    fn save(&mut self) {
        match self.filename.clone() {
            Some(path) => self.write_to(&path),
            None => self.prompt = Some(ActivePrompt::SaveAs(Prompt::save_as())),
        }
    }

    fn write_to(&mut self, path: &Path) {
        match self.doc.save(path) {
            Ok(bytes) => self.message.set(format!("{bytes} bytes written to disk")),
            Err(err) => {
                tracing::warn!(target: "io", error = %err, "save failed");
                self.message
                    .set(format!("Can't save! I/O error: {}", err.io_error()));
            }
        }
    }

    // ── Prompts ────────────────────────────────────────────────────────────

    fn start_find(&mut self) {
        let search = SearchState::begin(self.cursor, self.view);
        self.prompt = Some(ActivePrompt::Search(Prompt::search(), search));
    }

    fn prompt_key(&mut self, active: ActivePrompt, key: Key) {
        match active {
            ActivePrompt::SaveAs(mut prompt) => match prompt.handle_key(key) {
                PromptEvent::Pending => self.prompt = Some(ActivePrompt::SaveAs(prompt)),
                PromptEvent::Accepted => {
                    let name = String::from_utf8_lossy(prompt.input()).into_owned();
                    self.doc.select_language_for(&name);
                    let path = PathBuf::from(name);
                    self.write_to(&path);
                    self.filename = Some(path);
                }
                PromptEvent::Cancelled => self.message.set("Save aborted"),
            },
            ActivePrompt::Search(mut prompt, mut search) => {
                let event = prompt.handle_key(key);
                search.update(
                    prompt.input(),
                    key,
                    &mut self.doc,
                    &mut self.cursor,
                    &mut self.view,
                );
                match event {
                    PromptEvent::Pending => {
                        self.prompt = Some(ActivePrompt::Search(prompt, search));
                    }
                    PromptEvent::Accepted | PromptEvent::Cancelled => search.finish(
                        event == PromptEvent::Accepted,
                        &mut self.doc,
                        &mut self.cursor,
                        &mut self.view,
                    ),
                }
            }
        }
    }

    // ── Display ────────────────────────────────────────────────────────────

    fn scroll(&mut self) {
        self.cursor.clamp_to_row(&self.doc);
        self.cursor.update_rx(&self.doc);
        self.view.scroll(&self.cursor);
    }

    fn display_name(&self) -> Option<Cow<'_, str>> {
        self.filename.as_deref().map(Path::to_string_lossy)
    }
}

// ─── App ────────────────────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        self.cursor_visible = true;
        self.last_blink = Instant::now();

        let action = match self.prompt.take() {
            Some(active) => {
                self.prompt_key(active, key);
                Action::Continue
            }
            None => self.process_key(key),
        };
        self.scroll();
        action
    }

    fn on_resize(&mut self, size: Size) {
        self.view.resize(usize::from(size.rows), usize::from(size.cols));
        self.scroll();
    }

    fn on_tick(&mut self) -> bool {
        let now = Instant::now();
        let mut changed = false;

        if now.duration_since(self.last_blink) >= self.options.blink_interval {
            self.cursor_visible = !self.cursor_visible;
            self.last_blink = now;
            changed = true;
        }
        if clock::wall_clock() != self.painted_clock {
            changed = true;
        }
        let message_visible = self
            .message
            .visible(now, self.options.message_timeout)
            .is_some();
        changed | (message_visible != self.painted_message)
    }

    fn paint(&mut self, out: &mut OutputBuffer) {
        self.scroll();
        let now = Instant::now();
        let clock = clock::wall_clock();

        let prompt_line = self.prompt.as_ref().map(|p| p.prompt().line());
        let message = prompt_line
            .as_deref()
            .or_else(|| self.message.visible(now, self.options.message_timeout));
        let name = self.display_name();

        let frame = Frame {
            doc: &self.doc,
            cursor: &self.cursor,
            view: &self.view,
            filename: name.as_deref(),
            overwrite: self.overwrite,
            message,
            clock,
            show_cursor: self.cursor_visible,
        };
        if let Err(err) = frame.draw(out) {
            tracing::error!(target: "terminal", error = %err, "frame serialization failed");
        }

        let painted_message = self
            .message
            .visible(now, self.options.message_timeout)
            .is_some();
        self.painted_message = painted_message;
        self.painted_clock = clock;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
