use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a UTF-8 lyric file. A leading byte-order mark is dropped so it does
/// not show up on the first line.
pub fn read_lyrics(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("lyrics file not found or unreadable: {}", path.display()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.txt");
        fs::write(&path, "\u{feff}first\nsecond").unwrap();
        assert_eq!(read_lyrics(&path).unwrap(), "first\nsecond");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_lyrics(Path::new("/nonexistent/lyrics.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lyrics.txt"));
    }
}
