//! Navigation state machine.
//!
//! [`PlaylistCursor`] owns the playlist and the single [`NavigationState`] and
//! turns Forward/Backward events into new positions. Within a song the
//! display window slides one page at a time, so consecutive views overlap by
//! one page. Leaving the last page of a song moves to the first page of the
//! next song and leaving the first page moves to the last page of the
//! previous song; both ends of the playlist wrap.
//!
//! The cursor has no interior synchronisation. It is meant to live on the
//! thread that runs the main loop and to be driven one event at a time.

use tracing::{debug, info};

use crate::error::LyricsError;
use crate::models::{LinesPerPage, NavEvent, NavigationState, Page, Playlist, Song};
use crate::paginator::{page_at, page_count};

/// Outcome of a single transition, used by the front-end to flash a notice
/// when the song changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved one page inside the current song.
    WithinSong,
    /// Moved to another song. `wrapped` is set when the move crossed the end
    /// (or start) of the playlist.
    SongChanged { wrapped: bool },
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub song_index: usize,
    pub song_count: usize,
    pub left: Page,
    /// `None` when the left page is the last page of the song.
    pub right: Option<Page>,
    pub page_index: usize,
    pub total_pages: usize,
}

/// Owns the playlist plus the current position and resolves navigation.
#[derive(Debug, Clone)]
pub struct PlaylistCursor {
    playlist: Playlist,
    lines_per_page: LinesPerPage,
    /// Page count per song for the current `lines_per_page`.
    page_counts: Vec<usize>,
    state: NavigationState,
}

impl PlaylistCursor {
    /// Start at the first page of the first song.
    pub fn new(songs: Vec<Song>, lines_per_page: usize) -> Result<Self, LyricsError> {
        let lines_per_page = LinesPerPage::new(lines_per_page)?;
        let playlist = Playlist::new(songs)?;
        Ok(Self::with_playlist(playlist, lines_per_page))
    }

    /// Build from already validated parts; cannot fail.
    pub fn with_playlist(playlist: Playlist, lines_per_page: LinesPerPage) -> Self {
        let page_counts = count_pages(&playlist, lines_per_page);
        Self {
            playlist,
            lines_per_page,
            page_counts,
            state: NavigationState::default(),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn lines_per_page(&self) -> LinesPerPage {
        self.lines_per_page
    }

    pub fn current_song(&self) -> &Song {
        &self.playlist.songs()[self.state.song_index]
    }

    /// Page count of the song at `song_index`, or `None` past the end of the
    /// playlist.
    pub fn total_pages(&self, song_index: usize) -> Option<usize> {
        self.page_counts.get(song_index).copied()
    }

    /// Page count of a song index the cursor has already validated.
    fn pages_in(&self, song_index: usize) -> usize {
        self.page_counts[song_index]
    }

    /// Sum of every song's page count: the number of distinct positions.
    pub fn total_positions(&self) -> usize {
        self.page_counts.iter().sum()
    }

    /// Move forward one page, or to the first page of the next song when the
    /// current page is the song's last.
    pub fn advance(&mut self) -> Transition {
        let NavigationState {
            song_index,
            page_index,
        } = self.state;

        let transition = if page_index + 1 < self.pages_in(song_index) {
            self.state.page_index += 1;
            Transition::WithinSong
        } else {
            let next = (song_index + 1) % self.playlist.len();
            self.state = NavigationState::new(next, 0);
            Transition::SongChanged {
                wrapped: next <= song_index,
            }
        };

        self.log_transition("forward", transition);
        transition
    }

    /// Move back one page, or to the last page of the previous song when the
    /// current page is the song's first.
    pub fn retreat(&mut self) -> Transition {
        let NavigationState {
            song_index,
            page_index,
        } = self.state;

        let transition = if page_index > 0 {
            self.state.page_index -= 1;
            Transition::WithinSong
        } else {
            let count = self.playlist.len();
            let previous = (song_index + count - 1) % count;
            let last_page = self.pages_in(previous) - 1;
            self.state = NavigationState::new(previous, last_page);
            Transition::SongChanged {
                wrapped: previous >= song_index,
            }
        };

        self.log_transition("backward", transition);
        transition
    }

    /// Dispatch an input event. Returns `None` for `Quit`, which leaves the
    /// position untouched.
    pub fn apply(&mut self, event: NavEvent) -> Option<Transition> {
        match event {
            NavEvent::Forward => Some(self.advance()),
            NavEvent::Backward => Some(self.retreat()),
            NavEvent::Quit => None,
        }
    }

    /// Re-paginate every song for a new page height. The current page index
    /// is clamped to the current song's new last page. On error nothing
    /// changes.
    pub fn set_lines_per_page(&mut self, lines_per_page: usize) -> Result<(), LyricsError> {
        let lines_per_page = LinesPerPage::new(lines_per_page)?;
        self.lines_per_page = lines_per_page;
        self.page_counts = count_pages(&self.playlist, lines_per_page);

        let last_page = self.pages_in(self.state.song_index) - 1;
        if self.state.page_index > last_page {
            self.state.page_index = last_page;
        }

        info!(
            lines_per_page = lines_per_page.get(),
            position = %self.state,
            "re-paginated playlist"
        );
        Ok(())
    }

    /// The visible page pair plus the header/footer details for it.
    pub fn view(&self) -> PageView<'_> {
        let NavigationState {
            song_index,
            page_index,
        } = self.state;
        let song = self.current_song();

        let left = self.page(song, page_index).unwrap_or(Page {
            lines: Vec::new(),
            page_index,
            total_pages: self.pages_in(song_index),
        });
        let right = self.page(song, page_index + 1);

        PageView {
            title: &song.title,
            song_index,
            song_count: self.playlist.len(),
            left,
            right,
            page_index,
            total_pages: self.pages_in(song_index),
        }
    }

    fn page(&self, song: &Song, page_index: usize) -> Option<Page> {
        // `lines_per_page` is validated, so the paginator cannot refuse it.
        page_at(song, self.lines_per_page.get(), page_index)
            .ok()
            .flatten()
    }

    fn log_transition(&self, direction: &str, transition: Transition) {
        match transition {
            Transition::WithinSong => debug!(direction, position = %self.state, "page move"),
            Transition::SongChanged { wrapped } => info!(
                direction,
                wrapped,
                position = %self.state,
                title = %self.current_song().title,
                "song change"
            ),
        }
    }
}

fn count_pages(playlist: &Playlist, lines_per_page: LinesPerPage) -> Vec<usize> {
    playlist
        .songs()
        .iter()
        .map(|song| page_count(song.lines.len(), lines_per_page.get()).unwrap_or(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_with_lines(title: &str, count: usize) -> Song {
        Song::new(title, (0..count).map(|i| format!("{title}-{i}")).collect())
    }

    fn cursor(line_counts: &[usize], lines_per_page: usize) -> PlaylistCursor {
        let songs = line_counts
            .iter()
            .enumerate()
            .map(|(i, &n)| song_with_lines(&format!("s{i}"), n))
            .collect();
        PlaylistCursor::new(songs, lines_per_page).unwrap()
    }

    fn lines(page: &Page) -> Vec<&str> {
        page.lines.iter().map(String::as_str).collect()
    }

    #[test]
    fn construction_checks_preconditions() {
        assert_eq!(
            PlaylistCursor::new(Vec::new(), 20).unwrap_err(),
            LyricsError::EmptyPlaylist
        );
        assert_eq!(
            PlaylistCursor::new(vec![song_with_lines("a", 1)], 0).unwrap_err(),
            LyricsError::InvalidConfiguration { lines_per_page: 0 }
        );
        assert_eq!(cursor(&[3], 2).state(), NavigationState::new(0, 0));
    }

    #[test]
    fn display_window_overlaps_by_one_page() {
        let songs = vec![Song::new(
            "abc",
            ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect(),
        )];
        let mut cursor = PlaylistCursor::new(songs, 2).unwrap();

        let view = cursor.view();
        assert_eq!(lines(&view.left), vec!["a", "b"]);
        assert_eq!(view.right.as_ref().map(lines), Some(vec!["c", "d"]));

        cursor.advance();
        let view = cursor.view();
        assert_eq!(lines(&view.left), vec!["c", "d"]);
        assert_eq!(view.right.as_ref().map(lines), Some(vec!["e"]));

        cursor.advance();
        let view = cursor.view();
        assert_eq!(lines(&view.left), vec!["e"]);
        assert!(view.right.is_none());
        assert_eq!((view.page_index, view.total_pages), (2, 3));
    }

    #[test]
    fn forward_from_last_page_moves_to_next_song() {
        let mut cursor = cursor(&[2, 6], 2);
        assert_eq!(cursor.advance(), Transition::SongChanged { wrapped: false });
        assert_eq!(cursor.state(), NavigationState::new(1, 0));

        let mut visited = Vec::new();
        for _ in 0..5 {
            cursor.advance();
            visited.push(cursor.state());
        }
        assert_eq!(
            visited,
            vec![
                NavigationState::new(1, 1),
                NavigationState::new(1, 2),
                NavigationState::new(0, 0),
                NavigationState::new(1, 0),
                NavigationState::new(1, 1),
            ]
        );
    }

    #[test]
    fn backward_from_first_page_lands_on_previous_songs_last_page() {
        let mut cursor = cursor(&[4, 1], 2);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.state(), NavigationState::new(1, 0));

        assert_eq!(cursor.retreat(), Transition::SongChanged { wrapped: false });
        assert_eq!(cursor.state(), NavigationState::new(0, 1));
    }

    #[test]
    fn backward_from_start_wraps_to_end_of_last_song() {
        let mut cursor = cursor(&[1, 5], 2);
        assert_eq!(cursor.retreat(), Transition::SongChanged { wrapped: true });
        assert_eq!(cursor.state(), NavigationState::new(1, 2));
    }

    #[test]
    fn single_one_page_song_wraps_onto_itself() {
        let mut cursor = cursor(&[1], 20);
        assert_eq!(cursor.advance(), Transition::SongChanged { wrapped: true });
        assert_eq!(cursor.state(), NavigationState::new(0, 0));
        assert_eq!(cursor.retreat(), Transition::SongChanged { wrapped: true });
        assert_eq!(cursor.state(), NavigationState::new(0, 0));
    }

    #[test]
    fn apply_maps_events_and_quit_is_inert() {
        let mut cursor = cursor(&[5], 2);
        assert_eq!(cursor.apply(NavEvent::Forward), Some(Transition::WithinSong));
        assert_eq!(cursor.apply(NavEvent::Quit), None);
        assert_eq!(cursor.state(), NavigationState::new(0, 1));
        assert_eq!(cursor.apply(NavEvent::Backward), Some(Transition::WithinSong));
        assert_eq!(cursor.state(), NavigationState::new(0, 0));
    }

    #[test]
    fn empty_song_is_a_single_blank_position() {
        let mut cursor = cursor(&[0, 0], 20);
        assert_eq!(cursor.total_positions(), 2);
        let view = cursor.view();
        assert!(view.left.lines.is_empty());
        assert!(view.right.is_none());
        cursor.advance();
        assert_eq!(cursor.state(), NavigationState::new(1, 0));
    }

    #[test]
    fn repagination_clamps_page_index() {
        let mut cursor = cursor(&[10], 2);
        for _ in 0..4 {
            cursor.advance();
        }
        assert_eq!(cursor.state(), NavigationState::new(0, 4));

        cursor.set_lines_per_page(5).unwrap();
        assert_eq!(cursor.state(), NavigationState::new(0, 1));
        assert_eq!(cursor.total_pages(0), Some(2));
        assert!(cursor.view().right.is_none());
    }

    #[test]
    fn repagination_rejects_zero_and_keeps_state() {
        let mut cursor = cursor(&[10], 2);
        cursor.advance();
        assert!(cursor.set_lines_per_page(0).is_err());
        assert_eq!(cursor.lines_per_page().get(), 2);
        assert_eq!(cursor.total_pages(0), Some(5));
        assert_eq!(cursor.state(), NavigationState::new(0, 1));
    }

    #[test]
    fn total_pages_is_none_past_the_playlist() {
        let cursor = cursor(&[3, 0], 2);
        assert_eq!(cursor.total_pages(0), Some(2));
        assert_eq!(cursor.total_pages(1), Some(1));
        assert_eq!(cursor.total_pages(2), None);
    }

    #[test]
    fn view_reports_header_details() {
        let mut cursor = cursor(&[1, 3], 1);
        cursor.advance();
        let view = cursor.view();
        assert_eq!(view.title, "s1");
        assert_eq!((view.song_index, view.song_count), (1, 2));
        assert_eq!(view.left.page_number(), 1);
        assert_eq!(view.right.map(|p| p.page_number()), Some(2));
    }
}
