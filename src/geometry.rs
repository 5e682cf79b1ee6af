//! Box geometry: drag normalization, validity filtering and hit-testing.
//!
//! These are pure functions over image-space coordinates, kept apart from the
//! session so they can be tested directly.

use crate::model::{BoundingBox, Point, Rect};

/// Turn a drag from `start` to `current` into a top-left anchored rectangle.
///
/// The drag may go in any of the four diagonal directions; the result is the
/// same for both orderings of the two corners.
pub fn normalize_drag(start: Point, current: Point) -> Rect {
    Rect::new(
        start.x.min(current.x),
        start.y.min(current.y),
        (current.x - start.x).abs(),
        (current.y - start.y).abs(),
    )
}

/// A rectangle is kept only if both sides strictly exceed `min_size`.
pub fn is_valid_box(rect: &Rect, min_size: f32) -> bool {
    rect.width > min_size && rect.height > min_size
}

/// Index of the most recently created box containing `point`.
///
/// Boxes are scanned newest first, so where boxes overlap the one drawn last
/// (rendered on top) wins.
pub fn hit_test(point: Point, boxes: &[BoundingBox]) -> Option<usize> {
    boxes.iter().rposition(|b| b.rect().contains(point))
}
