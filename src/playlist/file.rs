use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::models::{Playlist, Song};

use super::lyrics::read_lyrics;

/// On-disk playlist document.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlaylistFile {
    #[serde(default)]
    pub songs: Vec<PlaylistEntry>,
}

/// One song in the playlist file. Either `lyrics_file` points at a text file
/// or `lyrics` carries the text inline; when both are present the inline text
/// wins.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub title: String,
    #[serde(default)]
    pub lyrics_file: Option<PathBuf>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl PlaylistFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse playlist JSON")
    }

    /// Read every song's lyrics and build the playlist. Relative lyric paths
    /// are resolved against `base_dir`.
    pub fn into_playlist(self, base_dir: &Path) -> Result<Playlist> {
        let songs = self
            .songs
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_song(index, base_dir))
            .collect::<Result<Vec<_>>>()?;

        Ok(Playlist::new(songs)?)
    }
}

impl PlaylistEntry {
    fn into_song(self, index: usize, base_dir: &Path) -> Result<Song> {
        let title = self.title.trim();
        if title.is_empty() {
            bail!("song #{} has an empty title", index + 1);
        }

        let text = match (self.lyrics, self.lyrics_file) {
            (Some(text), _) => text,
            (None, Some(path)) => {
                let path = if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                };
                read_lyrics(&path).with_context(|| format!("failed to load lyrics for {title:?}"))?
            }
            (None, None) => return Err(anyhow!("song {title:?} has neither lyrics nor lyrics_file")),
        };

        Ok(Song::from_text(title, &text))
    }
}

/// Load the playlist at `config_path`.
///
/// The file is expected to live in a `config/` folder next to the lyric
/// folders, so relative lyric paths resolve against the parent of the
/// config file's directory. A config file without a grandparent resolves
/// against its own directory.
pub fn load_playlist(config_path: &Path) -> Result<Playlist> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read playlist file {}", config_path.display()))?;
    let file = PlaylistFile::from_json(&raw)
        .with_context(|| format!("invalid playlist file {}", config_path.display()))?;

    let base_dir = base_dir_for(config_path);
    let playlist = file.into_playlist(&base_dir)?;
    info!(
        path = %config_path.display(),
        songs = playlist.len(),
        "loaded playlist"
    );
    Ok(playlist)
}

fn base_dir_for(config_path: &Path) -> PathBuf {
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new(""));
    match config_dir.parent() {
        Some(root) => root.to_path_buf(),
        None => config_dir.to_path_buf(),
    }
}
