//! Startup errors for the pagination engine and navigation state machine.
//!
//! Once a [`crate::cursor::PlaylistCursor`] exists nothing in the core can
//! fail, so this taxonomy only covers the two preconditions checked while
//! building one. Errors from the loaders and input adapters stay in
//! `anyhow::Result` with context strings.

use thiserror::Error;

/// Fatal configuration problems detected before the main loop starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LyricsError {
    /// A page must hold at least one line.
    #[error("invalid configuration: lines per page must be at least 1 (got {lines_per_page})")]
    InvalidConfiguration { lines_per_page: usize },
    /// There is no song to show, so no valid starting position exists.
    #[error("playlist must contain at least one song")]
    EmptyPlaylist,
}
