//! Per-frame draw list for the rasterizer.
//!
//! The session does not draw anything itself. It describes what to draw for
//! the current image: every committed box with its outline color, stroke and
//! label, plus the dashed in-progress box while a drag is active.

use crate::constants::render::{
    CLASS_PALETTE, DASH_PATTERN, FONT_SIZE_DIVISOR, HIGHLIGHT_COLOR, LABEL_GAP, MIN_FONT_SIZE,
    SELECTED_STROKE_WIDTH, STROKE_WIDTH,
};
use crate::model::{BoundingBox, ImageRef, Point, Rect};

/// A committed box ready to be stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBox {
    pub rect: Rect,
    /// RGB outline and label color
    pub color: [u8; 3],
    pub stroke_width: f32,
    pub label: String,
    /// Baseline-left position of the label text
    pub label_anchor: Point,
    pub is_selected: bool,
}

/// The rectangle being dragged out, drawn with a dashed outline.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientBox {
    pub rect: Rect,
    pub color: [u8; 3],
    pub stroke_width: f32,
    /// Dash pattern as (on, off) lengths
    pub dash: [f32; 2],
}

/// Everything to draw over the current image.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image_name: String,
    /// Intrinsic image size, if known
    pub image_size: Option<(u32, u32)>,
    pub font_size: f32,
    pub boxes: Vec<DrawBox>,
    pub transient: Option<TransientBox>,
}

/// Outline color for a class index; the palette repeats.
pub fn class_color(class_index: usize) -> [u8; 3] {
    CLASS_PALETTE[class_index % CLASS_PALETTE.len()]
}

/// Label font size, scaled with the image width.
pub fn font_size_for(image_width: Option<u32>) -> f32 {
    image_width
        .map(|w| w as f32 / FONT_SIZE_DIVISOR)
        .unwrap_or(0.0)
        .max(MIN_FONT_SIZE)
}

/// Place the label above the box when there is room, otherwise just inside its top edge.
pub fn label_anchor(rect: &Rect, font_size: f32) -> Point {
    let y = if rect.y > font_size + LABEL_GAP {
        rect.y - LABEL_GAP
    } else {
        rect.y + font_size + LABEL_GAP
    };
    Point::new(rect.x, y)
}

/// Build the draw list for one image.
pub fn build_frame(
    image: &ImageRef,
    boxes: &[BoundingBox],
    selection: Option<usize>,
    transient: Option<Rect>,
) -> Frame {
    let image_size = image.dimensions();
    let font_size = font_size_for(image_size.map(|(w, _)| w));

    let boxes = boxes
        .iter()
        .enumerate()
        .map(|(index, bbox)| {
            let is_selected = selection == Some(index);
            let rect = *bbox.rect();
            DrawBox {
                rect,
                color: if is_selected {
                    HIGHLIGHT_COLOR
                } else {
                    class_color(bbox.class_index())
                },
                stroke_width: if is_selected {
                    SELECTED_STROKE_WIDTH
                } else {
                    STROKE_WIDTH
                },
                label: bbox.label(),
                label_anchor: label_anchor(&rect, font_size),
                is_selected,
            }
        })
        .collect();

    Frame {
        image_name: image.name().to_string(),
        image_size,
        font_size,
        boxes,
        transient: transient.map(|rect| TransientBox {
            rect,
            color: HIGHLIGHT_COLOR,
            stroke_width: STROKE_WIDTH,
            dash: DASH_PATTERN,
        }),
    }
}
