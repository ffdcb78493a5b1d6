//! Drives the viewer loop end to end with scripted input and an in-memory
//! terminal.

use std::time::Instant;

use footswitch_lyrics::input::{InputSource, ScriptedInput};
use footswitch_lyrics::ui::{drive, IDLE_BACKOFF};
use footswitch_lyrics::{App, NavEvent, NavigationState, PlaylistCursor, Song};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn app() -> App {
    let songs = vec![
        Song::from_text("Opener", "a\nb\nc\nd\ne"),
        Song::from_text("Closer", "x\ny"),
    ];
    App::new(PlaylistCursor::new(songs, 2).unwrap())
}

#[test]
fn events_are_applied_in_order_until_quit() {
    let mut app = app();
    let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
    let mut input = ScriptedInput::new([
        NavEvent::Forward,
        NavEvent::Forward,
        NavEvent::Forward,
        NavEvent::Backward,
        NavEvent::Quit,
        NavEvent::Forward,
    ]);

    drive(&mut terminal, &mut app, &mut input).unwrap();

    assert_eq!(app.cursor().state(), NavigationState::new(0, 2));
}

#[test]
fn quit_first_leaves_start_position() {
    let mut app = app();
    let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
    let mut input = ScriptedInput::new([NavEvent::Quit]);

    drive(&mut terminal, &mut app, &mut input).unwrap();

    assert_eq!(app.cursor().state(), NavigationState::new(0, 0));
}

/// Reports idle a fixed number of times before asking to quit.
struct IdleThenQuit {
    idle_polls: usize,
    polls: usize,
}

impl InputSource for IdleThenQuit {
    fn name(&self) -> &str {
        "idle"
    }

    fn poll_event(&mut self) -> anyhow::Result<Option<NavEvent>> {
        self.polls += 1;
        if self.polls > self.idle_polls {
            Ok(Some(NavEvent::Quit))
        } else {
            Ok(None)
        }
    }
}

#[test]
fn idle_non_blocking_input_is_paced() {
    let mut app = app();
    let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
    let mut input = IdleThenQuit {
        idle_polls: 5,
        polls: 0,
    };

    let started = Instant::now();
    drive(&mut terminal, &mut app, &mut input).unwrap();

    assert_eq!(input.polls, 6);
    assert!(started.elapsed() >= IDLE_BACKOFF * 5);
}
