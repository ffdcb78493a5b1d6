//! Core library surface for the footswitch lyrics viewer.
//!
//! The pagination engine ([`paginator`]) and the navigation state machine
//! ([`cursor`]) have no terminal or hardware dependencies; everything else
//! adapts the outside world to them. The binary only wires these pieces
//! together.
pub mod config;
pub mod cursor;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod paginator;
pub mod playlist;
pub mod ui;

/// Startup errors of the core.
pub use error::LyricsError;

/// The domain types that other layers pass around.
pub use models::{LinesPerPage, NavEvent, NavigationState, Page, Playlist, Song};

/// Pagination and navigation.
pub use cursor::{PageView, PlaylistCursor, Transition};
pub use paginator::paginate;

/// Loading and startup settings.
pub use config::{CliArgs, Settings};
pub use playlist::load_playlist;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
