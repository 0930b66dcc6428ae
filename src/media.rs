use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use walkdir::WalkDir;

/// Extensions Final Cut accepts inside a camera archive.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mov", "mp4", "avi", "m4v", "mxf", "mts", "m2t", "wav", "mp3", "aac", "m4a", "aiff", "aif",
    "jpeg", "jpg", "png", "tiff", "bmp", "gif", "tif",
];

#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Just the filename
    pub filename: String,
    /// Lowercased extension
    pub extension: String,
}

impl MediaFile {
    fn from_path(path: &Path) -> Option<Self> {
        let filename = path.file_name()?.to_str()?.to_string();
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            filename,
            extension,
        })
    }
}

/// One discovered media file with its resolved identity and date.
/// `date` stays `None` when date resolution is disabled.
#[derive(Debug, Clone)]
pub struct ResolvedClip {
    pub media: MediaFile,
    pub date: Option<NaiveDateTime>,
    pub clip_id: String,
}

/// Recursively list supported media files under `dir`, in stable name
/// order. That order defines the clip order in the descriptor.
pub fn scan_directory(dir: &Path) -> Result<Vec<MediaFile>> {
    let mut media = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(m) = MediaFile::from_path(entry.path()) {
            media.push(m);
        }
    }
    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn scan_filters_and_orders() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.jpg")).unwrap();
        File::create(dir.path().join("A.MOV")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("noext")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/c.wav")).unwrap();

        let media = scan_directory(dir.path()).unwrap();
        let names: Vec<&str> = media.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(names, ["A.MOV", "b.jpg", "c.wav"]);
        assert_eq!(media[0].extension, "mov");
    }

    #[test]
    fn scan_of_empty_directory_is_empty() {
        let dir = tempdir().unwrap();
        assert!(scan_directory(dir.path()).unwrap().is_empty());
    }
}
