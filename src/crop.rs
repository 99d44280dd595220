//! Crop geometry: four document corners against an oriented source image.
//!
//! # Coordinate spaces
//!
//! - **Native**: pixels of the decoded bitmap, before orientation.
//! - **Oriented**: native pixels after the orientation matrix, snapped so
//!   the image occupies `(0, 0)-(W', H')`. Corners are stored here, in
//!   native pixel units, which is also how corner detectors report them.
//! - **Scaled**: oriented space of a downscaled copy of the bitmap, used
//!   when the view displays a smaller texture than the source.
//! - **Display**: whatever a caller-supplied [`Transform`] maps oriented
//!   (or scaled) space to, usually screen pixels.
//!
//! Only the oriented integer corners are stored. Every other
//! representation is computed on demand and returned as an owned copy.

use crate::corners::{CornerSlot, Corners, Cutout, canonical_order};
use crate::error::CropError;
use crate::geometry::{Point, PointF, RectF, Size};
use crate::orientation::Orientation;
use crate::session::ImageInfo;
use crate::tracker::{CorrespondenceTracker, MappedCutout};
use crate::transform::Transform;

/// Document corners for one loaded image.
///
/// # Example
///
/// ```
/// use zencrop::{CropGeometry, Orientation, Size, Transform};
///
/// let mut crop = CropGeometry::new(Size::new(1000, 2000), Orientation::Normal);
/// crop.expand();
/// crop.rotate_right();
///
/// assert_eq!(crop.oriented_size(), Size::new(2000, 1000));
/// let bounds = crop.map_origin(&Transform::IDENTITY, None);
/// assert_eq!((bounds.width(), bounds.height()), (2000.0, 1000.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CropGeometry {
    native: Size,
    orientation: Orientation,
    corners: Option<Corners<Point>>,
}

impl CropGeometry {
    /// Geometry with no corners yet.
    pub fn new(native: Size, orientation: Orientation) -> Self {
        Self {
            native,
            orientation,
            corners: None,
        }
    }

    /// Geometry seeded with corners already in oriented space.
    ///
    /// Slots are relabelled into canonical order; see [`set_corners`](Self::set_corners).
    pub fn with_corners(native: Size, orientation: Orientation, seed: Corners<Point>) -> Self {
        Self {
            native,
            orientation,
            corners: Some(seed.canonicalized()),
        }
    }

    /// Geometry for a freshly decoded image, with no corners yet.
    pub fn from_image(info: &ImageInfo) -> Result<Self, CropError> {
        let native = info.size()?;
        let orientation = Orientation::try_from(info.exif_orientation)?;
        Ok(Self::new(native, orientation))
    }

    /// Size of the source bitmap.
    pub fn native_size(&self) -> Size {
        self.native
    }

    /// Size of the source bitmap after orientation.
    pub fn oriented_size(&self) -> Size {
        self.orientation
            .transform_dimensions(self.native.width, self.native.height)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether corners have been detected, set, or expanded.
    pub fn has_corners(&self) -> bool {
        self.corners.is_some()
    }

    /// Stored corners in oriented space.
    pub fn corners(&self) -> Option<&Corners<Point>> {
        self.corners.as_ref()
    }

    /// Replace the corners. No validity checks.
    ///
    /// Stored corners are always in canonical order: top-left is the point
    /// nearest the origin and the cutout runs clockwise from it. The points
    /// are kept, their slots may change.
    pub fn set_corners(&mut self, corners: Corners<Point>) {
        self.corners = Some(corners.canonicalized());
    }

    /// Forget the corners.
    pub fn reset(&mut self) {
        self.corners = None;
    }

    /// Orientation matrix snapped so the oriented image starts at `(0, 0)`.
    ///
    /// Maps native bitmap pixels into oriented space; it is the base
    /// matrix for drawing the bitmap.
    pub fn matrix(&self) -> Transform {
        self.orientation.matrix().snapped(self.native.to_rect())
    }

    /// Corners mapped through `display`, in corners form, without reordering.
    pub fn map_corners(&self, display: &Transform) -> Option<Corners<PointF>> {
        let corners = self.corners?;
        Some(corners.to_f().map(|p| display.map_point(p)))
    }

    /// Corners in canonical cutout order after scaling and `display`,
    /// together with the slot each position came from.
    ///
    /// `scaled` is the size of the displayed bitmap before orientation.
    pub fn map_cutout_points(
        &self,
        display: &Transform,
        scaled: Option<Size>,
    ) -> Option<(Cutout<PointF>, [CornerSlot; 4])> {
        let corners = self.corners?;
        let (kx, ky) = self.scale_ratio(scaled).unwrap_or((1.0, 1.0));
        let cutout = corners
            .to_f()
            .map(|p| display.map_point(PointF::new(p.x * kx, p.y * ky)))
            .into_cutout();
        let slots = Corners(CornerSlot::ALL).into_cutout();
        let order = canonical_order(&cutout.0);
        Some((cutout.permuted(order), slots.permuted(order).0))
    }

    /// Like [`map_cutout_points`](Self::map_cutout_points), recording each
    /// displayed point's slot in `tracker`.
    pub fn map_cutout(
        &self,
        display: &Transform,
        scaled: Option<Size>,
        tracker: &mut CorrespondenceTracker,
    ) -> Option<MappedCutout> {
        let (points, slots) = self.map_cutout_points(display, scaled)?;
        Some(tracker.record_all(points, slots))
    }

    /// Full oriented image bounds (scaled if given) mapped through `display`.
    pub fn map_origin(&self, display: &Transform, scaled: Option<Size>) -> RectF {
        let bounds = scaled.unwrap_or(self.native).to_rect();
        let oriented = self.orientation.matrix().map_rect(bounds).snap_to_origin();
        display.map_rect(oriented)
    }

    /// Change orientation, re-expressing the corners so they outline the
    /// same part of the picture in the new oriented frame.
    ///
    /// # Panics
    ///
    /// If the current orientation matrix is singular. None of the defined
    /// orientations are.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }

        let current = self.orientation.matrix();
        let bounds = current.map_rect(self.native.to_rect()).snap_to_origin();
        let Some(inverse) = current.invert() else {
            panic!("non-invertible orientation matrix for {:?}", self.orientation);
        };
        // Back to native, into the new frame, then snapped to the origin.
        let step = inverse.then(orientation.matrix()).snapped(bounds);

        if let Some(corners) = self.corners {
            let cutout = corners
                .to_f()
                .into_cutout()
                .map(|p| step.map_point(p))
                .canonicalize();
            self.corners = Some(cutout.into_corners().map(PointF::round));
        }

        log::trace!(
            "orientation {:?} -> {:?}, corners {:?}",
            self.orientation,
            orientation,
            self.corners
        );
        self.orientation = orientation;
    }

    /// Turn the picture 90° clockwise.
    pub fn rotate_right(&mut self) {
        self.set_orientation(self.orientation.rotate_right());
    }

    /// Turn the picture 90° counter-clockwise.
    pub fn rotate_left(&mut self) {
        self.set_orientation(self.orientation.rotate_left());
    }

    /// Select the whole oriented image.
    pub fn expand(&mut self) {
        self.corners = Some(Corners::full(self.oriented_size()));
    }

    /// Store an edited corner, then restore canonical slot order.
    ///
    /// `image_point` is in oriented space, or in scaled space when `scaled`
    /// is given. Returns `false` when there are no corners to edit.
    pub fn commit_corner(
        &mut self,
        slot: CornerSlot,
        image_point: PointF,
        scaled: Option<Size>,
    ) -> bool {
        let (kx, ky) = self.scale_ratio(scaled).unwrap_or((1.0, 1.0));
        let Some(corners) = self.corners.as_mut() else {
            return false;
        };
        let stored = PointF::new(image_point.x / kx, image_point.y / ky).round();
        log::trace!("commit {slot:?} = {stored:?}");
        corners[slot] = stored;
        *corners = corners.canonicalized();
        true
    }

    /// Oriented-space scale factors from native to `scaled`, or `None`
    /// when no scaling applies.
    fn scale_ratio(&self, scaled: Option<Size>) -> Option<(f64, f64)> {
        let scaled = scaled.filter(|s| *s != self.native && !s.is_empty())?;
        let from = self.oriented_size();
        if from.is_empty() {
            return None;
        }
        let to = self
            .orientation
            .transform_dimensions(scaled.width, scaled.height);
        Some((
            to.width as f64 / from.width as f64,
            to.height as f64 / from.height as f64,
        ))
    }
}
