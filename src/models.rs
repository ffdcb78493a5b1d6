//! Domain models shared by the paginator, the navigation cursor, and the
//! terminal front-end. These types stay plain data holders: songs are loaded
//! once and never change, pages are recomputed whenever they are needed, and
//! the navigation position is a small copyable value owned by the cursor.

use std::fmt;

use crate::error::LyricsError;
use crate::paginator::split_lines;

/// Page height used when the command line does not override it.
pub const DEFAULT_LINES_PER_PAGE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A song as the performer sees it: a title and the lyric body broken into
/// lines. The playlist owns every song and nothing mutates one after loading.
pub struct Song {
    /// Title shown in the header. Titles are not required to be unique; the
    /// position in the playlist is the identity.
    pub title: String,
    /// Lyric body split on line breaks. May be empty.
    pub lines: Vec<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// Build a song from raw lyric text, splitting on `\n`, `\r\n` and `\r`.
    pub fn from_text(title: impl Into<String>, text: &str) -> Self {
        Self::new(title, split_lines(text))
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One window of lyric lines. Pages are views derived from a song and a page
/// height; they are never stored or edited.
pub struct Page {
    pub lines: Vec<String>,
    /// 0-based position inside the owning song.
    pub page_index: usize,
    /// Page count of the owning song. Always at least 1.
    pub total_pages: usize,
}

impl Page {
    /// 1-based number printed in the footer.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}

/// Validated page height. Holding one of these means the paginator cannot
/// reject the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinesPerPage(usize);

impl LinesPerPage {
    pub fn new(lines: usize) -> Result<Self, LyricsError> {
        if lines == 0 {
            Err(LyricsError::InvalidConfiguration {
                lines_per_page: lines,
            })
        } else {
            Ok(Self(lines))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for LinesPerPage {
    fn default() -> Self {
        Self(DEFAULT_LINES_PER_PAGE)
    }
}

impl fmt::Display for LinesPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
/// Ordered, non-empty list of songs.
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    /// Wrap the loaded songs, refusing an empty list because no starting
    /// position would exist.
    pub fn new(songs: Vec<Song>) -> Result<Self, LyricsError> {
        if songs.is_empty() {
            return Err(LyricsError::EmptyPlaylist);
        }
        Ok(Self { songs })
    }

    /// Convenience constructor for the `(title, lyric text)` pairs handed over
    /// by a playlist source.
    pub fn from_texts<I, T, L>(entries: I) -> Result<Self, LyricsError>
    where
        I: IntoIterator<Item = (T, L)>,
        T: Into<String>,
        L: AsRef<str>,
    {
        let songs = entries
            .into_iter()
            .map(|(title, text)| Song::from_text(title, text.as_ref()))
            .collect();
        Self::new(songs)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Always `false`; kept so the type reads like a collection.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }
}

/// Current (song, page) position. The cursor keeps both indexes in range;
/// nothing else constructs or edits one while the viewer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NavigationState {
    pub song_index: usize,
    pub page_index: usize,
}

impl NavigationState {
    pub const fn new(song_index: usize, page_index: usize) -> Self {
        Self {
            song_index,
            page_index,
        }
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.song_index, self.page_index)
    }
}

/// Discrete signal produced by every input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEvent {
    Forward,
    Backward,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_per_page_rejects_zero() {
        assert_eq!(
            LinesPerPage::new(0),
            Err(LyricsError::InvalidConfiguration { lines_per_page: 0 })
        );
        assert_eq!(LinesPerPage::new(3).map(LinesPerPage::get), Ok(3));
        assert_eq!(LinesPerPage::default().get(), DEFAULT_LINES_PER_PAGE);
    }

    #[test]
    fn empty_playlist_is_refused() {
        let err = Playlist::new(Vec::new()).unwrap_err();
        assert_eq!(err, LyricsError::EmptyPlaylist);
    }

    #[test]
    fn playlist_from_texts_splits_lyrics() {
        let playlist = Playlist::from_texts([("One", "a\nb"), ("One", "")]).unwrap();
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.songs()[0].lines, vec!["a", "b"]);
        assert!(playlist.songs()[1].lines.is_empty());
        assert_eq!(playlist.songs()[0].title, playlist.songs()[1].title);
    }

    #[test]
    fn page_number_is_one_based() {
        let page = Page {
            lines: Vec::new(),
            page_index: 2,
            total_pages: 3,
        };
        assert_eq!(page.page_number(), 3);
    }
}
