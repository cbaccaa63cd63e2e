//! Where caption tracks come from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Extension caption tracks are stored with, compared case-insensitively.
pub const CAPTION_EXTENSION: &str = "vtt";

/// Lists caption tracks and reads their raw bytes.
pub trait CaptionSource {
    /// Track identifiers in scan order.
    fn tracks(&self) -> io::Result<Vec<String>>;

    /// Read the full content of `track`.
    fn read(&self, track: &str) -> io::Result<Vec<u8>>;

    /// Human readable description used in error messages.
    fn location(&self) -> String;
}

/// Caption tracks stored as `.vtt` files directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Whether `path` has the caption extension, ignoring case.
pub fn is_caption_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(CAPTION_EXTENSION))
        .unwrap_or(false)
}

impl CaptionSource for DirectorySource {
    /// A missing directory has no tracks rather than being an error, so the
    /// caller can decide to download into it.
    fn tracks(&self) -> io::Result<Vec<String>> {
        trace!("tracks(dir={})", self.dir.display());
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && is_caption_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths.iter().map(|p| p.display().to_string()).collect())
    }

    fn read(&self, track: &str) -> io::Result<Vec<u8>> {
        trace!("read(track={track})");
        fs::read(track)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_only_caption_files_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b [2].vtt"), "WEBVTT").unwrap();
        fs::write(dir.path().join("a [1].VTT"), "WEBVTT").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.vtt")).unwrap();
        let source = DirectorySource::new(dir.path());
        let tracks = source.tracks().unwrap();
        let names: Vec<String> = tracks
            .iter()
            .map(|t| Path::new(t).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a [1].VTT", "b [2].vtt"]);
        assert_eq!(source.read(&tracks[1]).unwrap(), b"WEBVTT");
    }

    #[test]
    fn missing_directory_has_no_tracks() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("vtt_files"));
        assert!(source.tracks().unwrap().is_empty());
    }
}
