//! Points, sizes and rectangles shared by every coordinate space.
//!
//! Integer [`Point`]s live in native pixel space and are what the crop
//! geometry stores. Floating [`PointF`]s carry display and editing
//! coordinates; they are produced on demand and never stored.

use core::ops::{Add, Sub};

use num_traits::Float;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle `(0, 0)-(width, height)`.
    pub fn to_rect(self) -> RectF {
        RectF::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

/// Integer point in native pixel space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Widen to floating point.
    pub fn to_f(self) -> PointF {
        PointF::new(self.x as f64, self.y as f64)
    }
}

/// Floating point in display or editing space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance from the coordinate origin.
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        Float::sqrt((self - other).length_squared())
    }

    /// Round to the nearest pixel, halves towards positive infinity.
    pub fn round(self) -> Point {
        Point::new(round_half_up(self.x), round_half_up(self.y))
    }
}

impl Add for PointF {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointF {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        p.to_f()
    }
}

/// Axis-aligned rectangle with floating edges.
///
/// `right`/`bottom` are exclusive edges, so `width = right - left`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    /// Create a new rect from its edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest rect containing every point. Empty at the origin for no points.
    pub fn bounding(points: &[PointF]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        let mut r = Self::new(first.x, first.y, first.x, first.y);
        for p in rest {
            r.left = r.left.min(p.x);
            r.top = r.top.min(p.y);
            r.right = r.right.max(p.x);
            r.bottom = r.bottom.max(p.y);
        }
        r
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Top-left corner.
    pub fn origin(&self) -> PointF {
        PointF::new(self.left, self.top)
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Translate so the top-left corner sits at `(0, 0)`.
    pub fn snap_to_origin(self) -> Self {
        self.offset(-self.left, -self.top)
    }

    /// Pixel size of the smallest integer rect enclosing this one.
    pub fn round_out_size(&self) -> Size {
        let left = Float::floor(self.left);
        let top = Float::floor(self.top);
        let right = Float::ceil(self.right);
        let bottom = Float::ceil(self.bottom);
        Size::new(
            (right - left).max(0.0) as u32,
            (bottom - top).max(0.0) as u32,
        )
    }

    /// Whether `p` lies inside or on the edges.
    pub fn contains(&self, p: PointF) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Round half up (`floor(v + 0.5)`), the rounding every pixel write-back uses.
pub(crate) fn round_half_up(v: f64) -> i32 {
    Float::floor(v + 0.5) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(-1.5), -1);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(PointF::new(9.5, -2.5).round(), Point::new(10, -2));
    }

    #[test]
    fn bounding_rect() {
        let r = RectF::bounding(&[
            PointF::new(3.0, -1.0),
            PointF::new(-2.0, 4.0),
            PointF::new(1.0, 1.0),
        ]);
        assert_eq!(r, RectF::new(-2.0, -1.0, 3.0, 4.0));
        assert_eq!(r.width(), 5.0);
        assert_eq!(r.snap_to_origin(), RectF::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(RectF::bounding(&[]), RectF::default());
    }

    #[test]
    fn round_out_covers_fractional_edges() {
        let r = RectF::new(0.5, 0.2, 10.1, 20.0);
        assert_eq!(r.round_out_size(), Size::new(11, 20));
    }

    #[test]
    fn distance() {
        let a = PointF::new(0.0, 0.0);
        let b = PointF::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.length_squared(), 25.0);
    }
}
