//! # geode-editor — Editor core for geode
//!
//! Everything between the terminal layer and the key bindings:
//!
//! - **[`language`]** — static filetype tables (keywords, operators, comments)
//! - **[`highlight`]** — per-row syntax classification
//! - **[`row`]** — one line: raw bytes, tab-expanded render, highlight
//! - **[`document`]** — the rows of a file, dirty counter, load/save, the
//!   comment cascade
//! - **[`cursor`]** and **[`view`]** — position and scroll state
//! - **[`prompt`]** and **[`search`]** — message-bar input and incremental
//!   search on top of it
//! - **[`message`]** — the timed status message
//! - **[`render`]** — one frame into one output buffer
//! - **[`options`]** — tunables

pub mod cursor;
pub mod document;
pub mod highlight;
pub mod language;
pub mod message;
pub mod options;
pub mod prompt;
pub mod render;
pub mod row;
pub mod search;
pub mod view;
