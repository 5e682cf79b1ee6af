//! Geometry primitives and the committed bounding-box record.

/// A 2D point. Whether it is in surface or image space depends on the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge X coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge Y coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle. All four edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Clip the rectangle to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> Rect {
        let x0 = self.x.clamp(0.0, width);
        let y0 = self.y.clamp(0.0, height);
        let x1 = self.right().clamp(0.0, width);
        let y1 = self.bottom().clamp(0.0, height);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A committed bounding box on one image.
///
/// Boxes are never edited in place; changing one means deleting it and drawing a
/// new one, so the fields are only readable.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    rect: Rect,
    class_index: usize,
    class_name: String,
}

impl BoundingBox {
    /// Build a box from an image-space rectangle.
    ///
    /// Returns `None` unless the rectangle is finite, starts at non-negative
    /// coordinates and is strictly larger than `min_size` on both axes.
    pub fn new(
        rect: Rect,
        min_size: f32,
        class_index: usize,
        class_name: impl Into<String>,
    ) -> Option<Self> {
        let finite = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || rect.x < 0.0 || rect.y < 0.0 {
            return None;
        }
        if !crate::geometry::is_valid_box(&rect, min_size) {
            return None;
        }
        Some(Self {
            rect,
            class_index,
            class_name: class_name.into(),
        })
    }

    /// Rectangle in absolute image pixels.
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Class index captured when the box was drawn.
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Class display name captured when the box was drawn.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Text shown next to the box: the captured name, or the index if the name was empty.
    pub fn label(&self) -> String {
        if self.class_name.is_empty() {
            self.class_index.to_string()
        } else {
            self.class_name.clone()
        }
    }
}
