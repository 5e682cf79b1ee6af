//! Label format encoding.
//!
//! Boxes are stored in absolute image pixels and only converted to the
//! normalized YOLO text format when a dataset is exported.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bbox_labeler::format::{encode_label_file, encode_class_file};
//!
//! let labels = encode_label_file(store.boxes("photo.jpg"), 640, 480, 3)?;
//! let classes = encode_class_file(&registry);
//! ```

mod error;
mod yolo;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use yolo::{
    NormalizedBox, encode_class_file, encode_label_file, encode_lines, parse_label_line,
    to_normalized,
};
