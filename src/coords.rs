//! Surface-to-image coordinate mapping.
//!
//! The rendering surface holds the image at its intrinsic resolution but may be
//! displayed stretched on screen. Pointer events arrive in screen pixels and are
//! mapped back here with one scale factor per axis, so a surface shown at a
//! different aspect ratio than the image still maps exactly.

use crate::model::Point;

/// On-screen placement of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    /// Left edge in screen pixels
    pub left: f32,
    /// Top edge in screen pixels
    pub top: f32,
    /// Displayed width in screen pixels
    pub width: f32,
    /// Displayed height in screen pixels
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Surface displayed 1:1 at the origin.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Per-axis `(intrinsic / displayed)` factors, or `None` if the surface has no area.
    pub fn scale_factors(&self, image_width: u32, image_height: u32) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((
            image_width as f32 / self.width,
            image_height as f32 / self.height,
        ))
    }
}

/// Map a screen-space point on the surface to image pixels.
///
/// Returns `None` when the surface is collapsed to zero size.
pub fn to_image_space(
    surface_point: Point,
    surface: &SurfaceRect,
    image_width: u32,
    image_height: u32,
) -> Option<Point> {
    let (scale_x, scale_y) = surface.scale_factors(image_width, image_height)?;
    Some(Point::new(
        (surface_point.x - surface.left) * scale_x,
        (surface_point.y - surface.top) * scale_y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_mapping() {
        let surface = SurfaceRect::unscaled(640, 480);
        let p = to_image_space(Point::new(12.0, 34.0), &surface, 640, 480).unwrap();
        assert!(approx_eq(p.x, 12.0));
        assert!(approx_eq(p.y, 34.0));
    }

    #[test]
    fn test_offset_and_uniform_scale() {
        // 1000x500 image shown at half size, 100px from the left, 50px from the top
        let surface = SurfaceRect::new(100.0, 50.0, 500.0, 250.0);
        let p = to_image_space(Point::new(350.0, 175.0), &surface, 1000, 500).unwrap();
        assert!(approx_eq(p.x, 500.0));
        assert!(approx_eq(p.y, 250.0));
    }

    #[test]
    fn test_non_uniform_scale_uses_independent_axes() {
        // 800x600 image squashed into a 400x600 box
        let surface = SurfaceRect::new(0.0, 0.0, 400.0, 600.0);
        let p = to_image_space(Point::new(100.0, 100.0), &surface, 800, 600).unwrap();
        assert!(approx_eq(p.x, 200.0));
        assert!(approx_eq(p.y, 100.0));
    }

    #[test]
    fn test_collapsed_surface() {
        let surface = SurfaceRect::new(0.0, 0.0, 0.0, 100.0);
        assert!(to_image_space(Point::new(1.0, 1.0), &surface, 10, 10).is_none());
    }
}
