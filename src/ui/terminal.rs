use std::io::{self, Stdout};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::info;

use crate::input::InputSource;

use super::app::App;

/// Pause after an idle poll when no input source waits on its own.
pub const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Spin up the terminal backend, enter the draw loop, and keep processing
/// input until a Quit event arrives. The terminal is restored even when the
/// loop fails.
pub fn run_app(app: &mut App, input: &mut dyn InputSource) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let result = drive(&mut terminal, app, input);

    cleanup_terminal(&mut terminal)?;
    info!("viewer closed");
    result
}

/// The main loop: draw, wait for one event, resolve it, repeat. Events are
/// handled strictly one at a time. When `input` does not block, idle polls
/// are spaced by [`IDLE_BACKOFF`].
pub fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    input: &mut dyn InputSource,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        match input.poll_event().context("input polling failed")? {
            Some(event) => {
                if app.handle_event(event) {
                    return Ok(());
                }
            }
            None if !input.blocks() => thread::sleep(IDLE_BACKOFF),
            None => {}
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
