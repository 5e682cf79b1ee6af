//! YOLO TXT label codec.
//!
//! Each image gets one text file with a line per box:
//! `<class_index> <x_center> <y_center> <width> <height>`, where the four
//! geometric values are divided by the image width or height. The class list is
//! written separately, one name per line, in index order.

use crate::format::error::FormatError;
use crate::model::{BoundingBox, ClassRegistry, Rect};

/// A box in normalized center/size form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub class_index: usize,
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedBox {
    /// Same box written under a different class index.
    pub fn with_class(mut self, class_index: usize) -> Self {
        self.class_index = class_index;
        self
    }

    /// Format as a label line with `precision` decimals per value.
    pub fn to_line(&self, precision: usize) -> String {
        format!(
            "{} {:.p$} {:.p$} {:.p$} {:.p$}",
            self.class_index,
            self.cx,
            self.cy,
            self.width,
            self.height,
            p = precision
        )
    }

    /// Rescale to absolute top-left anchored pixels.
    pub fn to_absolute(&self, image_width: u32, image_height: u32) -> Rect {
        let (w, h) = (f64::from(image_width), f64::from(image_height));
        let width = self.width * w;
        let height = self.height * h;
        Rect::new(
            (self.cx * w - width / 2.0) as f32,
            (self.cy * h - height / 2.0) as f32,
            width as f32,
            height as f32,
        )
    }
}

fn check_dimensions(image_width: u32, image_height: u32) -> Result<(f64, f64), FormatError> {
    if image_width == 0 || image_height == 0 {
        return Err(FormatError::InvalidDimensions {
            width: image_width,
            height: image_height,
        });
    }
    Ok((f64::from(image_width), f64::from(image_height)))
}

/// Convert an absolute pixel box to normalized center/size form.
pub fn to_normalized(
    bbox: &BoundingBox,
    image_width: u32,
    image_height: u32,
) -> Result<NormalizedBox, FormatError> {
    let (w, h) = check_dimensions(image_width, image_height)?;
    let rect = bbox.rect();
    let (x, y) = (f64::from(rect.x), f64::from(rect.y));
    let (bw, bh) = (f64::from(rect.width), f64::from(rect.height));

    Ok(NormalizedBox {
        class_index: bbox.class_index(),
        cx: (x + bw / 2.0) / w,
        cy: (y + bh / 2.0) / h,
        width: bw / w,
        height: bh / h,
    })
}

/// Join normalized boxes into label file text, one line per box.
pub fn encode_lines(boxes: &[NormalizedBox], precision: usize) -> String {
    boxes
        .iter()
        .map(|b| b.to_line(precision))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode the boxes of one image as label file text, keeping box order.
///
/// An empty list yields an empty string; the file is still written.
pub fn encode_label_file(
    boxes: &[BoundingBox],
    image_width: u32,
    image_height: u32,
    precision: usize,
) -> Result<String, FormatError> {
    let normalized = boxes
        .iter()
        .map(|b| to_normalized(b, image_width, image_height))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(encode_lines(&normalized, precision))
}

/// Encode the class list, one name per line in index order.
pub fn encode_class_file(classes: &ClassRegistry) -> String {
    classes.names().join("\n")
}

/// Parse one label line back into normalized form.
pub fn parse_label_line(line: &str) -> Result<NormalizedBox, FormatError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(FormatError::invalid_line(
            line,
            format!("expected 5 fields, found {}", parts.len()),
        ));
    }

    let class_index: usize = parts[0]
        .parse()
        .map_err(|_| FormatError::invalid_line(line, "class index is not an integer"))?;
    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts[1..]) {
        *slot = part
            .parse()
            .map_err(|_| FormatError::invalid_line(line, format!("'{}' is not a number", part)))?;
    }
    let [cx, cy, width, height] = values;

    Ok(NormalizedBox {
        class_index,
        cx,
        cy,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_line() {
        let b = parse_label_line("0 0.5 0.5 0.2 0.3").unwrap();
        assert_eq!(b.class_index, 0);
        assert!((b.cx - 0.5).abs() < 1e-9);
        assert!((b.height - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_parse_label_line_rejects_garbage() {
        assert!(parse_label_line("0 0.5 0.5 0.2").is_err());
        assert!(parse_label_line("x 0.5 0.5 0.2 0.3").is_err());
        assert!(parse_label_line("1 0.5 abc 0.2 0.3").is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let b = BoundingBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), 5.0, 0, "a").unwrap();
        assert_eq!(
            to_normalized(&b, 0, 10),
            Err(FormatError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
    }
}
