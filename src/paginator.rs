//! Splits a song's lyric lines into fixed-height pages.
//!
//! Everything here is a pure function of `(song, lines_per_page)`. Callers may
//! cache the result for as long as the page height stays fixed, but nothing in
//! this module keeps state, so re-running it after a configuration change
//! never sees stale pages.

use crate::error::LyricsError;
use crate::models::{Page, Song};

/// Split lyric text on `\r\n`, `\r` and `\n`. A trailing line break does not
/// produce an extra empty line and empty text produces no lines at all.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Number of pages a song with `line_count` lines occupies. An empty song
/// still has one (blank) page.
pub fn page_count(line_count: usize, lines_per_page: usize) -> Result<usize, LyricsError> {
    check_lines_per_page(lines_per_page)?;
    Ok(line_count.div_ceil(lines_per_page).max(1))
}

/// Break `song` into consecutive pages of exactly `lines_per_page` lines; only
/// the final page may be shorter.
pub fn paginate(song: &Song, lines_per_page: usize) -> Result<Vec<Page>, LyricsError> {
    let total_pages = page_count(song.lines.len(), lines_per_page)?;

    if song.lines.is_empty() {
        return Ok(vec![Page {
            lines: Vec::new(),
            page_index: 0,
            total_pages,
        }]);
    }

    let pages = song
        .lines
        .chunks(lines_per_page)
        .enumerate()
        .map(|(page_index, chunk)| Page {
            lines: chunk.to_vec(),
            page_index,
            total_pages,
        })
        .collect();
    Ok(pages)
}

/// Materialise a single page without building the whole sequence. Returns
/// `None` when `page_index` is past the last page.
pub fn page_at(
    song: &Song,
    lines_per_page: usize,
    page_index: usize,
) -> Result<Option<Page>, LyricsError> {
    let total_pages = page_count(song.lines.len(), lines_per_page)?;
    if page_index >= total_pages {
        return Ok(None);
    }

    let start = page_index * lines_per_page;
    let end = (start + lines_per_page).min(song.lines.len());
    let lines = song.lines.get(start..end).unwrap_or_default().to_vec();

    Ok(Some(Page {
        lines,
        page_index,
        total_pages,
    }))
}

fn check_lines_per_page(lines_per_page: usize) -> Result<(), LyricsError> {
    if lines_per_page == 0 {
        Err(LyricsError::InvalidConfiguration { lines_per_page })
    } else {
        Ok(())
    }
}
