//! Four-point corner sets in their two index orders.
//!
//! A document quadrilateral is stored in *corners form*
//! `[top-left, top-right, bottom-left, bottom-right]` and drawn in
//! *cutout form*, a clockwise traversal. The forms differ by swapping
//! indices 2 and 3. They are separate types so one is never passed where
//! the other is expected; [`Corners::into_cutout`] and
//! [`Cutout::into_corners`] are the only ways across.
//!
//! ```text
//!     corners form        cutout form
//!     0 ───── 1           0 ───── 1
//!     │       │           │       │
//!     2 ───── 3           3 ───── 2
//! ```

use core::ops::{Index, IndexMut};

use crate::error::CropError;
use crate::geometry::{Point, PointF, Size};

/// One of the four stored corner positions, in corners-form order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CornerSlot {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl CornerSlot {
    /// All slots in corners-form order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Index into a corners-form array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot at a corners-form index. `None` outside `0..4`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Corner set in corners form: `[TL, TR, BL, BR]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corners<P>(pub [P; 4]);

impl<P> Corners<P> {
    /// Create from the four named corners.
    pub fn new(top_left: P, top_right: P, bottom_left: P, bottom_right: P) -> Self {
        Self([top_left, top_right, bottom_left, bottom_right])
    }

    /// Re-index into cutout form (swap 2 and 3).
    pub fn into_cutout(self) -> Cutout<P> {
        Cutout(swap_forms(self.0))
    }

    pub fn map<Q>(self, f: impl FnMut(P) -> Q) -> Corners<Q> {
        Corners(self.0.map(f))
    }

    pub fn points(&self) -> &[P; 4] {
        &self.0
    }
}

impl Corners<Point> {
    /// Corners of the rectangle `(0, 0)-(width, height)`.
    ///
    /// Dimensions beyond `i32::MAX` saturate.
    pub fn full(size: Size) -> Self {
        let w = i32::try_from(size.width).unwrap_or(i32::MAX);
        let h = i32::try_from(size.height).unwrap_or(i32::MAX);
        Self::new(
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(0, h),
            Point::new(w, h),
        )
    }

    /// Widen to floating point.
    pub fn to_f(&self) -> Corners<PointF> {
        self.map(Point::to_f)
    }

    /// Relabel the slots so the cutout form is in canonical order.
    ///
    /// The point set is unchanged. Top-left becomes the point nearest the
    /// origin and the rest follow clockwise.
    pub fn canonicalized(self) -> Self {
        let order = canonical_order(&self.to_f().into_cutout().0);
        self.into_cutout().permuted(order).into_corners()
    }
}

impl<P> Index<CornerSlot> for Corners<P> {
    type Output = P;

    fn index(&self, slot: CornerSlot) -> &P {
        &self.0[slot.index()]
    }
}

impl<P> IndexMut<CornerSlot> for Corners<P> {
    fn index_mut(&mut self, slot: CornerSlot) -> &mut P {
        &mut self.0[slot.index()]
    }
}

impl<P: Copy> TryFrom<&[P]> for Corners<P> {
    type Error = CropError;

    fn try_from(points: &[P]) -> Result<Self, Self::Error> {
        let array: [P; 4] = points.try_into().map_err(|_| CropError::CornerCount {
            expected: 4,
            actual: points.len(),
        })?;
        Ok(Self(array))
    }
}

impl<P> From<Cutout<P>> for Corners<P> {
    fn from(cutout: Cutout<P>) -> Self {
        cutout.into_corners()
    }
}

/// Corner set in cutout form: clockwise traversal for drawing an outline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cutout<P>(pub [P; 4]);

impl<P> Cutout<P> {
    /// Re-index into corners form (swap 2 and 3).
    pub fn into_corners(self) -> Corners<P> {
        Corners(swap_forms(self.0))
    }

    pub fn map<Q>(self, f: impl FnMut(P) -> Q) -> Cutout<Q> {
        Cutout(self.0.map(f))
    }

    pub fn points(&self) -> &[P; 4] {
        &self.0
    }

    /// Reorder so position `i` holds the item previously at `order[i]`.
    pub fn permuted(self, order: [usize; 4]) -> Self
    where
        P: Copy,
    {
        Self(permute(self.0, order))
    }
}

impl Cutout<PointF> {
    /// Canonical order: nearest to the origin first, then clockwise.
    ///
    /// Idempotent, and independent of which point the input starts at or
    /// which direction it runs.
    pub fn canonicalize(self) -> Self {
        let order = canonical_order(&self.0);
        self.permuted(order)
    }

    /// Whether the traversal runs clockwise on a y-down screen.
    /// Degenerate (zero-area) outlines count as clockwise.
    pub fn is_clockwise(&self) -> bool {
        winding(&self.0) <= 0.0
    }
}

impl<P> From<Corners<P>> for Cutout<P> {
    fn from(corners: Corners<P>) -> Self {
        corners.into_cutout()
    }
}

/// Source indices that put `points` into canonical cutout order.
///
/// The first index is the point nearest `(0, 0)`, ties going to the
/// smaller `y`, then the smaller `x`. The rest follow clockwise. A
/// counter-clockwise input is walked backwards from that first point.
pub fn canonical_order(points: &[PointF; 4]) -> [usize; 4] {
    let mut first = 0;
    for i in 1..4 {
        if nearer_origin(points[i], points[first]) {
            first = i;
        }
    }
    if winding(points) > 0.0 {
        [first, (first + 3) % 4, (first + 2) % 4, (first + 1) % 4]
    } else {
        [first, (first + 1) % 4, (first + 2) % 4, (first + 3) % 4]
    }
}

/// Shoelace accumulation `Σ xᵢ·yᵢ₋₁ − yᵢ·xᵢ₋₁`.
///
/// Positive means counter-clockwise on a y-down screen.
fn winding(points: &[PointF; 4]) -> f64 {
    let mut cross = 0.0;
    let mut j = points.len() - 1;
    for (i, p) in points.iter().enumerate() {
        let q = points[j];
        cross += p.x * q.y - p.y * q.x;
        j = i;
    }
    cross
}

fn nearer_origin(a: PointF, b: PointF) -> bool {
    let (da, db) = (a.length_squared(), b.length_squared());
    da < db || (da == db && (a.y < b.y || (a.y == b.y && a.x < b.x)))
}

fn swap_forms<P>(mut points: [P; 4]) -> [P; 4] {
    points.swap(2, 3);
    points
}

pub(crate) fn permute<P: Copy>(items: [P; 4], order: [usize; 4]) -> [P; 4] {
    order.map(|i| items[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pf(x: f64, y: f64) -> PointF {
        PointF::new(x, y)
    }

    fn quad() -> [PointF; 4] {
        // Irregular convex quad, clockwise on screen, nearest-first.
        [pf(12.0, 8.0), pf(410.0, 30.0), pf(390.0, 620.0), pf(25.0, 580.0)]
    }

    fn rotated(points: [PointF; 4], by: usize) -> [PointF; 4] {
        let mut p = points;
        p.rotate_left(by);
        p
    }

    // ── forms ───────────────────────────────────────────────────────────

    #[test]
    fn forms_swap_last_two() {
        let corners = Corners::new(1, 2, 3, 4);
        let cutout = corners.into_cutout();
        assert_eq!(cutout, Cutout([1, 2, 4, 3]));
        assert_eq!(cutout.into_corners(), corners);
        assert_eq!(Corners::from(Cutout::from(corners)), corners);
    }

    #[test]
    fn slot_indexing() {
        let mut corners = Corners::full(Size::new(10, 20));
        assert_eq!(corners[CornerSlot::BottomLeft], Point::new(0, 20));
        corners[CornerSlot::TopRight] = Point::new(9, 1);
        assert_eq!(corners.0[1], Point::new(9, 1));
        assert_eq!(CornerSlot::from_index(3), Some(CornerSlot::BottomRight));
        assert_eq!(CornerSlot::from_index(4), None);
    }

    #[test]
    fn from_slice_requires_four_points() {
        let pts = [Point::new(0, 0); 3];
        assert_eq!(
            Corners::try_from(&pts[..]),
            Err(CropError::CornerCount {
                expected: 4,
                actual: 3
            })
        );
        let pts = [Point::new(1, 1); 4];
        assert_eq!(Corners::try_from(&pts[..]), Ok(Corners(pts)));
    }

    #[test]
    fn full_saturates_huge_sizes() {
        let corners = Corners::full(Size::new(u32::MAX, 5));
        assert_eq!(corners[CornerSlot::TopRight], Point::new(i32::MAX, 0));
        assert_eq!(corners[CornerSlot::BottomRight], Point::new(i32::MAX, 5));
    }

    // ── canonical order ─────────────────────────────────────────────────

    #[test]
    fn full_rect_is_already_canonical() {
        let cutout = Corners::full(Size::new(1000, 2000)).to_f().into_cutout();
        assert_eq!(
            cutout.0,
            [pf(0.0, 0.0), pf(1000.0, 0.0), pf(1000.0, 2000.0), pf(0.0, 2000.0)]
        );
        assert_eq!(cutout.canonicalize(), cutout);
        assert!(cutout.is_clockwise());
    }

    #[test]
    fn canonicalized_relabels_slots() {
        let corners = Corners::new(
            Point::new(500, 10),
            Point::new(990, 500),
            Point::new(0, 490),
            Point::new(480, 1000),
        );
        let relabelled = corners.canonicalized();
        assert_eq!(
            relabelled,
            Corners::new(
                Point::new(0, 490),
                Point::new(500, 10),
                Point::new(480, 1000),
                Point::new(990, 500),
            )
        );
        assert_eq!(relabelled.canonicalized(), relabelled);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for by in 0..4 {
            let once = Cutout(rotated(quad(), by)).canonicalize();
            assert_eq!(once.canonicalize(), once, "start offset {by}");
        }
        let mut mirrored = quad();
        mirrored.reverse();
        let once = Cutout(mirrored).canonicalize();
        assert_eq!(once.canonicalize(), once);
    }

    #[test]
    fn canonicalize_ignores_start_and_direction() {
        let expected = Cutout(quad());
        for by in 0..4 {
            let input = rotated(quad(), by);
            assert_eq!(Cutout(input).canonicalize(), expected, "rotation {by}");

            let mut mirrored = input;
            mirrored.reverse();
            assert_eq!(Cutout(mirrored).canonicalize(), expected, "mirrored {by}");
        }
    }

    #[test]
    fn counter_clockwise_becomes_clockwise() {
        let ccw = Cutout([pf(0.0, 0.0), pf(0.0, 10.0), pf(10.0, 10.0), pf(10.0, 0.0)]);
        assert!(!ccw.is_clockwise());
        let c = ccw.canonicalize();
        assert!(c.is_clockwise());
        assert_eq!(c.0, [pf(0.0, 0.0), pf(10.0, 0.0), pf(10.0, 10.0), pf(0.0, 10.0)]);
    }

    #[test]
    fn equidistant_tie_prefers_smaller_y() {
        // (10,0) and (0,10) are both 10 from the origin.
        let c = Cutout([pf(0.0, 10.0), pf(10.0, 0.0), pf(20.0, 20.0), pf(5.0, 30.0)]);
        assert_eq!(c.canonicalize().0[0], pf(10.0, 0.0));
    }

    #[test]
    fn order_reports_source_indices() {
        let input = rotated(quad(), 2);
        assert_eq!(canonical_order(&input), [2, 3, 0, 1]);
        let mut mirrored = quad();
        mirrored.reverse();
        assert_eq!(canonical_order(&mirrored), [3, 2, 1, 0]);
    }
}
