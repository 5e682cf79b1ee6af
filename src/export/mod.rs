//! Dataset export.
//!
//! Export works on a [`DatasetSnapshot`] taken from the session at the moment the
//! user asks for it. The snapshot owns everything it needs, so the session can
//! keep changing while the archive is built, possibly on another thread
//! (see [`ExportWorker`]).
//!
//! The archive layout is fixed:
//!
//! ```text
//! images/<image name>
//! labels/<image name without extension>.txt
//! classes.txt
//! ```

mod archive;
#[cfg(not(target_arch = "wasm32"))]
mod worker;

use std::collections::HashSet;

use thiserror::Error;
use web_time::Instant;

use crate::constants::export::{ARCHIVE_NAME, CLASSES_FILE, IMAGES_DIR, LABELS_DIR};
use crate::format::{FormatError, encode_class_file, encode_lines, to_normalized};
use crate::model::{BoundingBox, ClassRegistry, ImageRef};

pub use archive::{ArchiveEntry, ArchiveError, Archiver, EntryContent, ZipArchiver};
#[cfg(not(target_arch = "wasm32"))]
pub use worker::ExportWorker;

/// Errors that stop an export. None of them touch session state.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export
    #[error("No images loaded")]
    NoImages,

    /// Class list is empty
    #[error("Please enter classes first")]
    NoClasses,

    /// Two snapshot images map to the same label file
    #[error("Label file '{0}' would be written twice")]
    DuplicateLabel(String),

    /// Label encoding failed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The archiver failed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// The background export thread could not be started or went away
    #[error("Export worker unavailable: {0}")]
    Worker(String),
}

/// One image and its boxes as they were when the snapshot was taken.
#[derive(Debug, Clone)]
pub struct SnapshotImage {
    pub image: ImageRef,
    pub boxes: Vec<BoundingBox>,
}

/// Frozen copy of everything an export needs.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub images: Vec<SnapshotImage>,
    pub classes: ClassRegistry,
    /// Decimals written per normalized value
    pub precision: usize,
}

/// Non-fatal issue found while exporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportWarning {
    /// Image the warning relates to
    pub image: String,
    /// Human-readable warning message
    pub message: String,
}

/// Summary of a finished export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    /// Number of images exported
    pub images_exported: usize,
    /// Number of boxes written to label files
    pub annotations_exported: usize,
    /// Warnings generated during export
    pub warnings: Vec<ExportWarning>,
}

impl ExportReport {
    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The downloadable result of an export.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested download name
    pub file_name: String,
    /// Archive bytes
    pub bytes: Vec<u8>,
    pub report: ExportReport,
}

impl DatasetSnapshot {
    /// Build the archive entries in a fixed order: for each image its bytes then
    /// its label file, then the class list.
    ///
    /// Boxes are written under the index their captured class name has in the
    /// current class list. A box whose name has disappeared keeps its stored
    /// index and is reported as a warning.
    pub fn build_entries(&self) -> Result<(Vec<ArchiveEntry>, ExportReport), ExportError> {
        if self.images.is_empty() {
            return Err(ExportError::NoImages);
        }
        if self.classes.is_empty() {
            return Err(ExportError::NoClasses);
        }

        let mut entries = Vec::with_capacity(self.images.len() * 2 + 1);
        let mut report = ExportReport::default();
        let mut label_paths = HashSet::with_capacity(self.images.len());

        for SnapshotImage { image, boxes } in &self.images {
            entries.push(ArchiveEntry::bytes(
                format!("{}/{}", IMAGES_DIR, image.name()),
                image.data().clone(),
            ));

            let label_path = format!("{}/{}", LABELS_DIR, image.label_file_name());
            if !label_paths.insert(label_path.clone()) {
                return Err(ExportError::DuplicateLabel(label_path));
            }
            let labels = self.encode_image_labels(image, boxes, &mut report)?;
            entries.push(ArchiveEntry::text(label_path, labels));
            report.images_exported += 1;
        }

        entries.push(ArchiveEntry::text(
            CLASSES_FILE,
            encode_class_file(&self.classes),
        ));

        Ok((entries, report))
    }

    fn encode_image_labels(
        &self,
        image: &ImageRef,
        boxes: &[BoundingBox],
        report: &mut ExportReport,
    ) -> Result<String, ExportError> {
        if boxes.is_empty() {
            return Ok(String::new());
        }
        let (width, height) = image
            .dimensions()
            .ok_or_else(|| FormatError::missing_dimensions(image.name()))?;

        let mut normalized = Vec::with_capacity(boxes.len());
        for bbox in boxes {
            let class_index = match self.classes.resolve(bbox.class_index(), bbox.class_name()) {
                Some(index) => index,
                None => {
                    log::warn!(
                        "Class '{}' of a box on '{}' is no longer defined; keeping index {}",
                        bbox.class_name(),
                        image.name(),
                        bbox.class_index()
                    );
                    report.warnings.push(ExportWarning {
                        image: image.name().to_string(),
                        message: format!(
                            "Class '{}' is not in the class list; exported with stale index {}",
                            bbox.class_name(),
                            bbox.class_index()
                        ),
                    });
                    bbox.class_index()
                }
            };
            normalized.push(to_normalized(bbox, width, height)?.with_class(class_index));
        }

        report.annotations_exported += normalized.len();
        Ok(encode_lines(&normalized, self.precision))
    }

    /// Build and package the dataset.
    pub fn export(&self, archiver: &dyn Archiver) -> Result<ExportArtifact, ExportError> {
        let started = Instant::now();
        let (entries, report) = self.build_entries()?;
        let bytes = archiver.archive(&entries)?;

        log::info!(
            "Exported {} images with {} annotations ({} warnings, {} bytes) in {:?}",
            report.images_exported,
            report.annotations_exported,
            report.warnings.len(),
            bytes.len(),
            started.elapsed()
        );

        Ok(ExportArtifact {
            file_name: ARCHIVE_NAME.to_string(),
            bytes,
            report,
        })
    }
}

#[cfg(test)]
mod tests;
