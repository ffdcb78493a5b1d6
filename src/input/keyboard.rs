use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{InputSource, NavEvent};

/// How long one keyboard poll may block. Short enough that the footswitch
/// and GPIO adapters are serviced promptly.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Terminal keyboard adapter backed by crossterm.
#[derive(Debug, Clone)]
pub struct KeyboardInput {
    poll_timeout: Duration,
}

impl KeyboardInput {
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_TIMEOUT)
    }
}

impl InputSource for KeyboardInput {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        if !event::poll(self.poll_timeout).context("event polling failed")? {
            return Ok(None);
        }
        match event::read().context("failed to read event")? {
            Event::Key(key_event) => Ok(map_key(key_event)),
            _ => Ok(None),
        }
    }

    fn blocks(&self) -> bool {
        true
    }
}

/// Translate a key press into a navigation event. Releases and repeats from
/// terminals that report them are ignored.
pub fn map_key(key: KeyEvent) -> Option<NavEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(NavEvent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Right | KeyCode::Down | KeyCode::PageDown | KeyCode::Enter => {
            Some(NavEvent::Forward)
        }
        KeyCode::Left | KeyCode::Up | KeyCode::PageUp => Some(NavEvent::Backward),
        KeyCode::Esc => Some(NavEvent::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'n' | 'f' | ' ' => Some(NavEvent::Forward),
            'b' | 'p' => Some(NavEvent::Backward),
            'q' => Some(NavEvent::Quit),
            _ => None,
        },
        _ => None,
    }
}
