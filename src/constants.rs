//! Global constants for the labeler.

/// Default minimum width/height (exclusive) for a committed bounding box, in image pixels.
pub const DEFAULT_MIN_BOX_SIZE: f32 = 5.0;

/// Default number of decimals written for normalized label values.
pub const DEFAULT_LABEL_PRECISION: usize = 3;

/// Image extensions accepted from the file provider (matched case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Layout of the exported dataset archive.
pub mod export {
    /// File name of the downloadable archive.
    pub const ARCHIVE_NAME: &str = "yolo_dataset.zip";
    /// Folder holding the original image bytes.
    pub const IMAGES_DIR: &str = "images";
    /// Folder holding one label file per image.
    pub const LABELS_DIR: &str = "labels";
    /// Root-level class list.
    pub const CLASSES_FILE: &str = "classes.txt";
    /// Extension of per-image label files.
    pub const LABEL_EXTENSION: &str = "txt";
}

/// Drawing hints handed to the rasterizer.
pub mod render {
    /// Per-class outline colors, indexed by `class_index % len`.
    pub const CLASS_PALETTE: [[u8; 3]; 12] = [
        [0xe7, 0x4c, 0x3c],
        [0x34, 0x98, 0xdb],
        [0x2e, 0xcc, 0x71],
        [0xf3, 0x9c, 0x12],
        [0x9b, 0x59, 0xb6],
        [0x1a, 0xbc, 0x9c],
        [0xe6, 0x7e, 0x22],
        [0x34, 0x49, 0x5e],
        [0x16, 0xa0, 0x85],
        [0xc0, 0x39, 0x2b],
        [0x29, 0x80, 0xb9],
        [0x8e, 0x44, 0xad],
    ];
    /// Outline color of the selected box and of the transient drag box.
    pub const HIGHLIGHT_COLOR: [u8; 3] = [0, 0, 0];
    /// Stroke width of unselected boxes.
    pub const STROKE_WIDTH: f32 = 3.0;
    /// Stroke width of the selected box.
    pub const SELECTED_STROKE_WIDTH: f32 = 4.0;
    /// Dash pattern (on, off) for the transient drag box.
    pub const DASH_PATTERN: [f32; 2] = [5.0, 5.0];
    /// Smallest label font size.
    pub const MIN_FONT_SIZE: f32 = 12.0;
    /// Label font size is `image_width / FONT_SIZE_DIVISOR`, floored at `MIN_FONT_SIZE`.
    pub const FONT_SIZE_DIVISOR: f32 = 60.0;
    /// Gap between a box edge and its label baseline.
    pub const LABEL_GAP: f32 = 5.0;
}
