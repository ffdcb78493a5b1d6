//! Playlist loading split across the file schema and the lyric reader.

mod file;
mod lyrics;

pub use file::{load_playlist, PlaylistEntry, PlaylistFile};
pub use lyrics::read_lyrics;
