//! Read-only view models for the host's side panels.

use crate::format::to_normalized;
use crate::model::{BoundingBox, ImageRef};
use crate::state::{AnnotationStore, ImageSet};

/// One row of the image list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageListEntry {
    pub name: String,
    pub is_current: bool,
    /// The image has at least one box
    pub is_annotated: bool,
}

/// One row of the annotation list for the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub label: String,
    /// `"cx cy w h"` at 3 decimals, or `None` while the image size is unknown
    pub normalized: Option<String>,
    pub is_selected: bool,
}

/// Header text for the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub image_name: String,
    /// e.g. `"3 / 15"`
    pub progress: String,
    /// e.g. `"640x480"`
    pub dimensions: Option<String>,
}

pub fn image_list(images: &ImageSet, store: &AnnotationStore) -> Vec<ImageListEntry> {
    images
        .images()
        .iter()
        .enumerate()
        .map(|(index, image)| ImageListEntry {
            name: image.name().to_string(),
            is_current: images.current_index() == Some(index),
            is_annotated: store.has_annotations(image.name()),
        })
        .collect()
}

pub fn annotation_rows(
    image: &ImageRef,
    boxes: &[BoundingBox],
    selection: Option<usize>,
) -> Vec<AnnotationRow> {
    boxes
        .iter()
        .enumerate()
        .map(|(index, bbox)| {
            let normalized = image
                .dimensions()
                .and_then(|(w, h)| to_normalized(bbox, w, h).ok())
                .map(|n| {
                    format!(
                        "{:.3} {:.3} {:.3} {:.3}",
                        n.cx, n.cy, n.width, n.height
                    )
                });
            AnnotationRow {
                label: bbox.label(),
                normalized,
                is_selected: selection == Some(index),
            }
        })
        .collect()
}

pub fn status_line(images: &ImageSet) -> Option<StatusLine> {
    let image = images.current()?;
    Some(StatusLine {
        image_name: image.name().to_string(),
        progress: images.progress(),
        dimensions: image.dimensions().map(|(w, h)| format!("{}x{}", w, h)),
    })
}
