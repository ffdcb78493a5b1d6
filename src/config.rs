//! Command-line arguments and startup settings.
//!
//! Everything here runs before the terminal enters raw mode, so failures
//! print normally.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::models::{LinesPerPage, DEFAULT_LINES_PER_PAGE};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".footswitch-lyrics";
/// Playlist looked up relative to the working directory first.
const DEFAULT_CONFIG_PATH: &str = "config/playlist.json";
const PLAYLIST_FILE_NAME: &str = "playlist.json";
const LOG_FILE_NAME: &str = "lyrics.log";

/// Raw command-line arguments, before defaults that need the filesystem are
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "footswitch-lyrics", version)]
#[command(about = "Footswitch-controlled lyrics display")]
#[command(
    after_help = "Controls: Right/Space/Enter = forward, Left = backward, Q/Esc = quit"
)]
pub struct CliArgs {
    /// Playlist file [default: config/playlist.json, then ~/.footswitch-lyrics/playlist.json]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Lines per page
    #[arg(long, value_name = "N", default_value_t = DEFAULT_LINES_PER_PAGE)]
    pub lines_per_page: usize,

    /// Footswitch device, e.g. /dev/input/event0 [default: auto-detected]
    #[arg(long, value_name = "PATH")]
    pub footswitch_device: Option<PathBuf>,

    /// Use the GPIO pedal board (pins 17/27, LEDs 22/23)
    #[arg(long)]
    pub gpio: bool,

    /// Log destination [default: ~/.footswitch-lyrics/lyrics.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log every page move
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Resolve defaults and validate values.
    pub fn into_settings(self) -> Result<Settings> {
        let lines_per_page = LinesPerPage::new(self.lines_per_page)?;

        let config_path = match self.config {
            Some(path) => path,
            None => default_config_path(Path::new(DEFAULT_CONFIG_PATH), data_dir().ok()),
        };

        let log_file = match self.log_file {
            Some(path) => path,
            None => data_dir()?.join(LOG_FILE_NAME),
        };

        Ok(Settings {
            config_path,
            lines_per_page,
            footswitch_device: self.footswitch_device,
            gpio: self.gpio,
            log_file,
            verbose: self.verbose,
        })
    }
}

/// Fully resolved startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_path: PathBuf,
    pub lines_per_page: LinesPerPage,
    /// Explicit evdev device; auto-detected when `None`.
    pub footswitch_device: Option<PathBuf>,
    /// Use the GPIO pedal board instead of a HID footswitch.
    pub gpio: bool,
    pub log_file: PathBuf,
    /// Log page moves as well as song changes.
    pub verbose: bool,
}

/// Application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Prefer the working-directory playlist; fall back to the one in the data
/// directory when only that exists.
fn default_config_path(local: &Path, data_dir: Option<PathBuf>) -> PathBuf {
    if local.exists() {
        return local.to_path_buf();
    }
    match data_dir.map(|dir| dir.join(PLAYLIST_FILE_NAME)) {
        Some(fallback) if fallback.exists() => fallback,
        _ => local.to_path_buf(),
    }
}
