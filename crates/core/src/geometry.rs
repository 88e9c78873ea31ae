//! Coordinate and color value types shared by the annotation engine
//!
//! Two coordinate spaces exist:
//! - View space: pointer positions as reported by the host, scaled by zoom
//! - Document space: zoom-independent page units, origin at the top-left
//!   corner of the page, y increasing downward
//!
//! Shapes are only ever stored in document space.

use serde::{Deserialize, Serialize};

/// Point in document (page) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: f32,
    pub y: f32,
}

impl DocPoint {
    /// Create a new document-space point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp the point into the page rectangle `[0, width] x [0, height]`
    pub fn clamp_to(&self, size: PageSize) -> Self {
        Self {
            x: self.x.clamp(0.0, size.width.max(0.0)),
            y: self.y.clamp(0.0, size.height.max(0.0)),
        }
    }
}

/// Point in view space (pointer coordinates under the current zoom)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewPoint {
    /// Create a new view-space point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Page dimensions in document units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for PageSize {
    /// US Letter in points
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
        }
    }
}

/// Axis-aligned box with `left <= right` and `top <= bottom`
///
/// Only constructible through [`Bounds::from_corners`], so the ordering
/// invariant always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Bounds {
    /// Normalize two arbitrary corners into a box
    ///
    /// The result does not depend on drag direction: swapping `a` and `b`
    /// yields the same box.
    pub fn from_corners(a: DocPoint, b: DocPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point of the box
    pub fn center(&self) -> DocPoint {
        DocPoint::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// The box as a `(left, top, right, bottom)` tuple
    pub fn to_tuple(&self) -> (f32, f32, f32, f32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

/// 8-bit RGB color as chosen for actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a new color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to normalized channels (0.0 to 1.0), `channel / 255`
    pub fn to_normalized(&self) -> RgbF {
        RgbF {
            r: f32::from(self.r) / 255.0,
            g: f32::from(self.g) / 255.0,
            b: f32::from(self.b) / 255.0,
        }
    }
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

/// Normalized RGB color, each channel in `[0.0, 1.0]`
///
/// This is the color representation handed to document writers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_corners_any_direction() {
        let down_right = Bounds::from_corners(DocPoint::new(10.0, 10.0), DocPoint::new(110.0, 60.0));
        let up_left = Bounds::from_corners(DocPoint::new(110.0, 60.0), DocPoint::new(10.0, 10.0));
        let mixed = Bounds::from_corners(DocPoint::new(10.0, 60.0), DocPoint::new(110.0, 10.0));

        assert_eq!(down_right, up_left);
        assert_eq!(down_right, mixed);
        assert_eq!(down_right.to_tuple(), (10.0, 10.0, 110.0, 60.0));
        assert_eq!(down_right.width(), 100.0);
        assert_eq!(down_right.height(), 50.0);
        assert_eq!(down_right.center(), DocPoint::new(60.0, 35.0));
    }

    #[test]
    fn test_color_normalization() {
        let rgb = Color::rgb(0, 153, 0).to_normalized();
        assert_eq!(rgb.r, 0.0);
        assert!((rgb.g - 0.6).abs() < 1e-6);
        assert_eq!(rgb.b, 0.0);

        let white = Color::rgb(255, 255, 255).to_normalized();
        assert_eq!(white, RgbF { r: 1.0, g: 1.0, b: 1.0 });
    }

    #[test]
    fn test_clamp_to_page() {
        let size = PageSize::new(100.0, 50.0);
        assert_eq!(DocPoint::new(-5.0, 80.0).clamp_to(size), DocPoint::new(0.0, 50.0));
        assert_eq!(DocPoint::new(20.0, 30.0).clamp_to(size), DocPoint::new(20.0, 30.0));
    }

    #[test]
    fn test_finite_check() {
        assert!(DocPoint::new(1.0, 2.0).is_finite());
        assert!(!DocPoint::new(f32::NAN, 2.0).is_finite());
        assert!(!DocPoint::new(1.0, f32::INFINITY).is_finite());
    }

    proptest! {
        #[test]
        fn normalization_is_symmetric_and_canonical(
            x1 in -1.0e4f32..1.0e4,
            y1 in -1.0e4f32..1.0e4,
            x2 in -1.0e4f32..1.0e4,
            y2 in -1.0e4f32..1.0e4,
        ) {
            let a = DocPoint::new(x1, y1);
            let b = DocPoint::new(x2, y2);
            let forward = Bounds::from_corners(a, b);
            let backward = Bounds::from_corners(b, a);

            prop_assert_eq!(forward, backward);
            prop_assert_eq!(
                forward.to_tuple(),
                (x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
            );
            prop_assert!(forward.left() <= forward.right());
            prop_assert!(forward.top() <= forward.bottom());
        }
    }
}
