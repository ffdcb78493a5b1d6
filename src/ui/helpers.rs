use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::cursor::PageView;
use crate::models::Page;

/// Footer label for the visible pair: `Pages 3-4 of 6`, or `Page 6 of 6`
/// when the right slot is empty.
pub(crate) fn page_label(view: &PageView<'_>) -> String {
    match &view.right {
        Some(right) => format!(
            "Pages {}-{} of {}",
            view.left.page_number(),
            right.page_number(),
            view.total_pages
        ),
        None => format!("Page {} of {}", view.left.page_number(), view.total_pages),
    }
}

/// Header counter shown at the top right.
pub(crate) fn song_counter(view: &PageView<'_>) -> String {
    format!("Song {}/{}", view.song_index + 1, view.song_count)
}

/// Lines of a page clipped to the rows available. Horizontal overflow is
/// clipped by the paragraph itself.
pub(crate) fn page_lines(page: &Page, height: u16) -> Vec<Line<'static>> {
    page.lines
        .iter()
        .take(height as usize)
        .map(|line| Line::from(line.clone()))
        .collect()
}

/// Produce a rectangle of the requested size centered within `area`, shrunk
/// to fit when `area` is smaller. Used for the song-change notice.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize, total: usize, lines: &[&str]) -> Page {
        Page {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            page_index: index,
            total_pages: total,
        }
    }

    fn view(right: Option<Page>) -> PageView<'static> {
        PageView {
            title: "Song",
            song_index: 1,
            song_count: 4,
            left: page(2, 4, &["a"]),
            right,
            page_index: 2,
            total_pages: 4,
        }
    }

    #[test]
    fn labels_pair_and_single_page() {
        assert_eq!(page_label(&view(Some(page(3, 4, &[])))), "Pages 3-4 of 4");
        assert_eq!(page_label(&view(None)), "Page 3 of 4");
        assert_eq!(song_counter(&view(None)), "Song 2/4");
    }

    #[test]
    fn page_lines_clip_to_height() {
        let lines = page_lines(&page(0, 1, &["a", "b", "c"]), 2);
        assert_eq!(lines.len(), 2);
        assert!(page_lines(&page(0, 1, &["a"]), 0).is_empty());
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 3, area), Rect::new(10, 3, 20, 3));
        assert_eq!(centered_rect(80, 30, area), area);
    }
}
