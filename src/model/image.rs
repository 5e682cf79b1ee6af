//! Loaded images and the raw files they come from.

use std::io::Cursor;
use std::sync::Arc;

use crate::constants::IMAGE_EXTENSIONS;

/// A named binary blob delivered by the file provider.
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// Name of the file, relative to the chosen source
    pub name: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Check if a filename has a recognised image extension (case-insensitive).
pub fn is_image_filename(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Strip the final extension from a name, keeping any folder prefix.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() && !ext.contains('/') => base,
        _ => name,
    }
}

/// An image in the session. Identity is its name.
#[derive(Clone, Debug)]
pub struct ImageRef {
    name: String,
    data: Arc<[u8]>,
    dimensions: Option<(u32, u32)>,
}

impl ImageRef {
    /// Wrap the bytes of an image, probing its intrinsic size from the header.
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let data = data.into();
        let dimensions = probe_dimensions(&data);
        if dimensions.is_none() {
            log::warn!("Could not read dimensions of '{}' from its header", name);
        }
        Self {
            name,
            data,
            dimensions,
        }
    }

    /// Same image with its intrinsic size reported by the renderer.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the raw bytes.
    pub fn data(&self) -> &Arc<[u8]> {
        &self.data
    }

    /// Intrinsic `(width, height)` in pixels, if known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions.filter(|(w, h)| *w > 0 && *h > 0)
    }

    /// Name of the label file for this image, e.g. `photo.jpg` -> `photo.txt`.
    pub fn label_file_name(&self) -> String {
        format!(
            "{}.{}",
            strip_extension(&self.name),
            crate::constants::export::LABEL_EXTENSION
        )
    }
}

/// Read `(width, height)` from an encoded image without decoding the pixels.
fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}
