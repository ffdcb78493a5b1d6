//! Diagnostics go to a log file because the terminal belongs to the viewer
//! while it runs.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::Level;

/// Install the global `tracing` subscriber, appending plain-text records to
/// `log_file`. Page moves are logged at DEBUG and only show up when
/// `verbose` is set.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
