//! EXIF-style orientation, its affine matrix, and rotate/flip steps.

use crate::error::CropError;
use crate::geometry::Size;
use crate::transform::Transform;

/// Image orientation, numbered like the EXIF orientation tag.
///
/// Each value names the affine matrix that takes native bitmap pixels to
/// the oriented frame, in screen convention (y down, clockwise angles):
///
/// ```text
///     EXIF  variant          matrix                        (x, y) ->
///     0/1   Undefined/Normal identity                      ( x,  y)
///     2     FlipHorizontal   scale(-1, 1)                  (-x,  y)
///     3     Rotate180        rotate(180)                   (-x, -y)
///     4     FlipVertical     scale(1, -1)                  ( x, -y)
///     5     Transpose        rotate(90) then scale(1, -1)  (-y, -x)
///     6     Rotate90         rotate(90)                    (-y,  x)
///     7     Transverse       rotate(90) then scale(-1, 1)  ( y,  x)
///     8     Rotate270        rotate(-90)                   ( y, -x)
/// ```
///
/// The matrices carry no translation; [`CropGeometry`](crate::CropGeometry)
/// snaps the transformed bounds back to the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Orientation {
    /// No orientation recorded. Treated as [`Normal`](Self::Normal).
    Undefined = 0,
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    /// 90° clockwise.
    Rotate90 = 6,
    Transverse = 7,
    /// 270° clockwise (90° counter-clockwise).
    Rotate270 = 8,
}

impl Orientation {
    /// The 8 distinct orientations, indexed by EXIF value - 1.
    pub const ALL: [Self; 8] = [
        Self::Normal,
        Self::FlipHorizontal,
        Self::Rotate180,
        Self::FlipVertical,
        Self::Transpose,
        Self::Rotate90,
        Self::Transverse,
        Self::Rotate270,
    ];

    /// Create from an EXIF orientation tag (0-8). Returns `None` for other values.
    pub fn from_exif(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Undefined),
            1..=8 => Some(Self::ALL[(value - 1) as usize]),
            _ => None,
        }
    }

    /// Convert to an EXIF orientation tag (0-8).
    pub fn to_exif(self) -> u8 {
        self as u8
    }

    /// Whether this maps native pixels onto themselves.
    pub fn is_identity(self) -> bool {
        matches!(self, Self::Undefined | Self::Normal)
    }

    /// Whether this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.linear()[0] == 0
    }

    /// Transform source dimensions to oriented dimensions.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Affine matrix taking native pixels to the oriented frame.
    pub fn matrix(self) -> Transform {
        match self {
            Self::Undefined | Self::Normal => Transform::IDENTITY,
            Self::FlipHorizontal => Transform::scale(-1.0, 1.0),
            Self::Rotate180 => Transform::rotate(180.0),
            Self::FlipVertical => Transform::scale(1.0, -1.0),
            Self::Transpose => Transform::rotate(90.0).then(Transform::scale(1.0, -1.0)),
            Self::Rotate90 => Transform::rotate(90.0),
            Self::Transverse => Transform::rotate(90.0).then(Transform::scale(-1.0, 1.0)),
            Self::Rotate270 => Transform::rotate(-90.0),
        }
    }

    /// Compose two orientations: apply `self` first, then `other`.
    ///
    /// [`Undefined`](Self::Undefined) composes as the identity and never
    /// appears in a result.
    pub fn compose(self, other: Self) -> Self {
        let [a, b, c, d] = self.linear();
        let [e, f, g, h] = other.linear();
        Self::from_linear([
            e * a + f * c,
            e * b + f * d,
            g * a + h * c,
            g * b + h * d,
        ])
    }

    /// The inverse orientation: `self.compose(self.inverse())` is the identity.
    pub fn inverse(self) -> Self {
        // Orthogonal matrices invert by transposition.
        let [a, b, c, d] = self.linear();
        Self::from_linear([a, c, b, d])
    }

    /// Orientation after turning the visible image 90° clockwise.
    pub fn rotate_right(self) -> Self {
        self.compose(Self::Rotate90)
    }

    /// Orientation after turning the visible image 90° counter-clockwise.
    pub fn rotate_left(self) -> Self {
        self.compose(Self::Rotate270)
    }

    /// Orientation after mirroring the visible image left to right.
    pub fn flip_horizontal(self) -> Self {
        self.compose(Self::FlipHorizontal)
    }

    /// Orientation after mirroring the visible image top to bottom.
    pub fn flip_vertical(self) -> Self {
        self.compose(Self::FlipVertical)
    }

    /// Integer linear part `[a, b, c, d]`: `x' = a·x + b·y`, `y' = c·x + d·y`.
    fn linear(self) -> [i8; 4] {
        match self {
            Self::Undefined | Self::Normal => [1, 0, 0, 1],
            Self::FlipHorizontal => [-1, 0, 0, 1],
            Self::Rotate180 => [-1, 0, 0, -1],
            Self::FlipVertical => [1, 0, 0, -1],
            Self::Transpose => [0, -1, -1, 0],
            Self::Rotate90 => [0, -1, 1, 0],
            Self::Transverse => [0, 1, 1, 0],
            Self::Rotate270 => [0, 1, -1, 0],
        }
    }

    fn from_linear(m: [i8; 4]) -> Self {
        // Products of signed permutation matrices stay in the group,
        // so the search always succeeds.
        Self::ALL
            .into_iter()
            .find(|o| o.linear() == m)
            .unwrap_or(Self::Normal)
    }
}

impl TryFrom<u8> for Orientation {
    type Error = CropError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_exif(value).ok_or(CropError::InvalidOrientation(value))
    }
}

impl From<Orientation> for u8 {
    fn from(o: Orientation) -> Self {
        o.to_exif()
    }
}
