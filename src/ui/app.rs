use std::time::{Duration, Instant};

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;
use tracing::info;

use crate::cursor::{PlaylistCursor, Transition};
use crate::models::NavEvent;

use super::helpers::{centered_rect, page_label, page_lines, song_counter};

/// Rows used by the title header, including its bottom rule.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for the status line and the page/hint line,
/// including the top rule.
const FOOTER_HEIGHT: u16 = 3;
/// How long the song-change notice stays on screen.
const NOTICE_DURATION: Duration = Duration::from_millis(500);
const NAV_HINT: &str = "← BACK | FORWARD → | Q to quit";

/// Short-lived banner shown after a song change.
struct Notice {
    text: &'static str,
    shown_at: Instant,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Viewer state: the navigation cursor plus transient screen decorations.
pub struct App {
    cursor: PlaylistCursor,
    notice: Option<Notice>,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(cursor: PlaylistCursor) -> Self {
        Self {
            cursor,
            notice: None,
            status: None,
        }
    }

    pub fn cursor(&self) -> &PlaylistCursor {
        &self.cursor
    }

    /// Resolve one event. Returns `true` when the viewer should exit.
    pub fn handle_event(&mut self, event: NavEvent) -> bool {
        match self.cursor.apply(event) {
            None => {
                info!("quit requested");
                true
            }
            Some(Transition::WithinSong) => false,
            Some(Transition::SongChanged { .. }) => {
                let text = match event {
                    NavEvent::Backward => "Previous Song",
                    _ => "Next Song",
                };
                self.notice = Some(Notice {
                    text,
                    shown_at: Instant::now(),
                });
                // Adapter warnings only matter until the performer moves on.
                self.clear_status();
                false
            }
        }
    }

    /// Text of the song-change notice if it is still showing.
    pub fn active_notice(&self) -> Option<&'static str> {
        self.notice
            .as_ref()
            .filter(|notice| notice.shown_at.elapsed() < NOTICE_DURATION)
            .map(|notice| notice.text)
    }

    pub fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_pages(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Some(text) = self.active_notice() {
            self.draw_notice(frame, area, text);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let view = self.cursor.view();
        let block = Block::default().borders(Borders::BOTTOM);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let title = Paragraph::new(Line::from(Span::styled(
            view.title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, inner);

        let counter = Paragraph::new(Line::from(Span::styled(
            song_counter(&view),
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::right(2)));
        frame.render_widget(counter, inner);
    }

    fn draw_pages(&self, frame: &mut Frame, area: Rect) {
        let view = self.cursor.view();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left_block = Block::default()
            .borders(Borders::RIGHT)
            .padding(Padding::horizontal(2));
        let left_inner = left_block.inner(columns[0]);
        let left = Paragraph::new(page_lines(&view.left, left_inner.height)).block(left_block);
        frame.render_widget(left, columns[0]);

        // An empty right column marks the end of the song.
        if let Some(right_page) = &view.right {
            let right_block = Block::default().padding(Padding::horizontal(2));
            let right_inner = right_block.inner(columns[1]);
            let right =
                Paragraph::new(page_lines(right_page, right_inner.height)).block(right_block);
            frame.render_widget(right, columns[1]);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let view = self.cursor.view();
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(block.inner(area));
        let dim = Style::default().add_modifier(Modifier::DIM);

        if let Some(status) = &self.status {
            let message = Paragraph::new(Line::from(Span::styled(
                status.text.clone(),
                status.kind.style(),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(message, rows[0]);
        }

        let pages = Paragraph::new(Line::from(Span::styled(page_label(&view), dim)))
            .block(Block::default().padding(Padding::left(2)));
        frame.render_widget(pages, rows[1]);

        let hint = Paragraph::new(Line::from(Span::styled(NAV_HINT, dim)))
            .alignment(Alignment::Right)
            .block(Block::default().padding(Padding::right(2)));
        frame.render_widget(hint, rows[1]);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, text: &str) {
        let width = text.chars().count() as u16 + 4;
        let popup_area = centered_rect(width, 3, area);
        frame.render_widget(Clear, popup_area);

        let notice = Paragraph::new(Line::from(text.to_string()))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::REVERSED),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, popup_area);
    }
}
