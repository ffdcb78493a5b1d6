//! Ratatui front-end: a title header, two lyric pages side by side, and a
//! footer with page numbers, adapter warnings, and the control hint.

mod app;
mod helpers;
mod terminal;

pub use app::{App, StatusKind};
pub use terminal::{drive, run_app, IDLE_BACKOFF};
