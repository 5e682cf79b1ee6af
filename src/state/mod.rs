//! Session state: the image list and the per-image annotations.

mod annotation_store;
mod image_set;

pub use annotation_store::AnnotationStore;
pub use image_set::{ImageSet, LoadError};
