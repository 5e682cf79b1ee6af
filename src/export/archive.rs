//! Archive packaging for exported datasets.
//!
//! The session hands a flat list of named entries to an [`Archiver`] and gets a
//! single blob back. [`ZipArchiver`] is the default implementation; hosts may
//! inject their own (for example one backed by a browser library).

use std::io::{Cursor, Write};
use std::sync::Arc;

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Errors raised by an archiver.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// ZIP encoding error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing the archive
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a host-provided archiver
    #[error("Archiver failed: {0}")]
    Failed(String),
}

/// Content of one archive entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    /// Raw bytes shared with the loaded image
    Bytes(Arc<[u8]>),
    /// UTF-8 text (label and class files)
    Text(String),
}

impl EntryContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EntryContent::Bytes(bytes) => bytes,
            EntryContent::Text(text) => text.as_bytes(),
        }
    }
}

/// A file to place in the archive at `path` (forward slashes, no leading slash).
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: EntryContent,
}

impl ArchiveEntry {
    pub fn bytes(path: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            path: path.into(),
            content: EntryContent::Bytes(bytes),
        }
    }

    pub fn text(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: EntryContent::Text(text.into()),
        }
    }
}

/// Packs a set of named entries into one downloadable blob.
pub trait Archiver: Send + Sync {
    /// Build the archive. Entries must be written in the given order.
    fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError>;
}

/// ZIP archiver built on the `zip` crate.
///
/// Folder entries are emitted for every parent directory the first time it is
/// seen. Timestamps are pinned so the same entries always give the same bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl ZipArchiver {
    fn options_for(entry: &ArchiveEntry) -> SimpleFileOptions {
        // Encoded images do not shrink further; store them as-is.
        let method = match entry.content {
            EntryContent::Bytes(_) => CompressionMethod::Stored,
            EntryContent::Text(_) => CompressionMethod::Deflated,
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
    }
}

impl Archiver for ZipArchiver {
    fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let dir_options = SimpleFileOptions::default().last_modified_time(DateTime::default());
        let mut dirs_written: Vec<String> = Vec::new();

        for entry in entries {
            let mut parent = String::new();
            let segments: Vec<&str> = entry.path.split('/').collect();
            for segment in &segments[..segments.len().saturating_sub(1)] {
                parent.push_str(segment);
                parent.push('/');
                if !dirs_written.contains(&parent) {
                    writer.add_directory(parent.as_str(), dir_options)?;
                    dirs_written.push(parent.clone());
                }
            }

            writer.start_file(entry.path.as_str(), Self::options_for(entry))?;
            writer.write_all(entry.content.as_bytes())?;
            log::trace!(
                "Archived '{}' ({} bytes)",
                entry.path,
                entry.content.as_bytes().len()
            );
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_entries() -> Vec<ArchiveEntry> {
        vec![
            ArchiveEntry::bytes("images/a.png", Arc::from(vec![1u8, 2, 3])),
            ArchiveEntry::text("labels/a.txt", "0 0.500 0.500 0.100 0.100"),
            ArchiveEntry::text("classes.txt", "cat"),
        ]
    }

    #[test]
    fn test_zip_contains_entries_and_folders() {
        let bytes = ZipArchiver.archive(&sample_entries()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        for expected in [
            "images/",
            "images/a.png",
            "labels/",
            "labels/a.txt",
            "classes.txt",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }

        let mut label = String::new();
        archive
            .by_name("labels/a.txt")
            .unwrap()
            .read_to_string(&mut label)
            .unwrap();
        assert_eq!(label, "0 0.500 0.500 0.100 0.100");

        let mut image = Vec::new();
        archive
            .by_name("images/a.png")
            .unwrap()
            .read_to_end(&mut image)
            .unwrap();
        assert_eq!(image, vec![1u8, 2, 3]);
    }

    #[test]
    fn test_zip_output_is_deterministic() {
        let first = ZipArchiver.archive(&sample_entries()).unwrap();
        let second = ZipArchiver.archive(&sample_entries()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text_entry_is_kept() {
        let bytes = ZipArchiver
            .archive(&[ArchiveEntry::text("labels/empty.txt", "")])
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.by_name("labels/empty.txt").unwrap().size(), 0);
    }
}
