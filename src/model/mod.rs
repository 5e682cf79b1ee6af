//! Data models for the labeler.

mod annotation;
mod class_registry;
mod image;

pub use annotation::{BoundingBox, Point, Rect};
pub use class_registry::ClassRegistry;
#[cfg(test)]
pub(crate) use image::encode_test_png;
pub use image::{ImageRef, SourceFile, is_image_filename, strip_extension};
