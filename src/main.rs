//! Binary entry point that glues the playlist, the navigation cursor, the
//! input adapters and the terminal front-end together.
use clap::Parser;
use footswitch_lyrics::ui::StatusKind;
use footswitch_lyrics::{input, load_playlist, logging, run_app, App, CliArgs, PlaylistCursor};

/// Parse arguments, load the playlist, and run the viewer until Quit.
///
/// Configuration and playlist problems are returned before the terminal is
/// switched into raw mode, so they print as ordinary error messages.
fn main() -> anyhow::Result<()> {
    let settings = CliArgs::parse().into_settings()?;
    logging::init(&settings.log_file, settings.verbose)?;

    let playlist = load_playlist(&settings.config_path)?;
    let cursor = PlaylistCursor::with_playlist(playlist, settings.lines_per_page);

    let input::InputSetup {
        input: mut merged,
        warnings,
    } = input::from_settings(&settings);

    let mut app = App::new(cursor);
    if let Some(warning) = warnings.last() {
        app.set_status(warning.clone(), StatusKind::Error);
    }

    run_app(&mut app, &mut merged)
}
