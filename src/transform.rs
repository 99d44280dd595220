//! 2D affine transforms in screen convention (y down, positive angles clockwise).

use num_traits::Float;

use crate::geometry::{PointF, RectF};

/// Affine transform mapping `(x, y)` to
///
/// ```text
///     x' = sx·x + kx·y + tx
///     y' = ky·x + sy·y + ty
/// ```
///
/// Composition reads left to right: `a.then(b)` applies `a` first.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub sx: f64,
    pub kx: f64,
    pub tx: f64,
    pub ky: f64,
    pub sy: f64,
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        kx: 0.0,
        tx: 0.0,
        ky: 0.0,
        sy: 1.0,
        ty: 0.0,
    };

    /// Scale about the origin.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            sx,
            kx: 0.0,
            tx: 0.0,
            ky: 0.0,
            sy,
            ty: 0.0,
        }
    }

    /// Translation by `(dx, dy)`.
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self {
            sx: 1.0,
            kx: 0.0,
            tx: dx,
            ky: 0.0,
            sy: 1.0,
            ty: dy,
        }
    }

    /// Rotation about the origin, clockwise on screen for positive `degrees`.
    ///
    /// Quarter turns are exact.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = match quarter_turns(degrees) {
            Some(0) => (0.0, 1.0),
            Some(1) => (1.0, 0.0),
            Some(2) => (0.0, -1.0),
            Some(3) => (-1.0, 0.0),
            _ => {
                let rad = Float::to_radians(degrees);
                (Float::sin(rad), Float::cos(rad))
            }
        };
        Self {
            sx: cos,
            kx: -sin,
            tx: 0.0,
            ky: sin,
            sy: cos,
            ty: 0.0,
        }
    }

    /// Apply `self`, then `next`.
    pub fn then(self, next: Self) -> Self {
        Self {
            sx: next.sx * self.sx + next.kx * self.ky,
            kx: next.sx * self.kx + next.kx * self.sy,
            tx: next.sx * self.tx + next.kx * self.ty + next.tx,
            ky: next.ky * self.sx + next.sy * self.ky,
            sy: next.ky * self.kx + next.sy * self.sy,
            ty: next.ky * self.tx + next.sy * self.ty + next.ty,
        }
    }

    /// Apply `self`, then translate by `(dx, dy)`.
    pub fn then_translate(self, dx: f64, dy: f64) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..self
        }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.kx * self.ky
    }

    /// Inverse transform, or `None` if the linear part is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if Float::abs(det) < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let sx = self.sy * inv;
        let kx = -self.kx * inv;
        let ky = -self.ky * inv;
        let sy = self.sx * inv;
        Some(Self {
            sx,
            kx,
            tx: -(sx * self.tx + kx * self.ty),
            ky,
            sy,
            ty: -(ky * self.tx + sy * self.ty),
        })
    }

    pub fn map_point(&self, p: PointF) -> PointF {
        PointF::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    /// Map every point in place.
    pub fn map_points(&self, points: &mut [PointF]) {
        for p in points {
            *p = self.map_point(*p);
        }
    }

    /// Bounding box of the four mapped corners of `rect`.
    pub fn map_rect(&self, rect: RectF) -> RectF {
        RectF::bounding(&[
            self.map_point(PointF::new(rect.left, rect.top)),
            self.map_point(PointF::new(rect.right, rect.top)),
            self.map_point(PointF::new(rect.left, rect.bottom)),
            self.map_point(PointF::new(rect.right, rect.bottom)),
        ])
    }

    /// Append a translation moving the mapped `rect` to the origin.
    pub fn snapped(self, rect: RectF) -> Self {
        let mapped = self.map_rect(rect);
        self.then_translate(-mapped.left, -mapped.top)
    }

    /// Whether every coefficient is within `eps` of `other`'s.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let close = |a: f64, b: f64| Float::abs(a - b) <= eps;
        close(self.sx, other.sx)
            && close(self.kx, other.kx)
            && close(self.tx, other.tx)
            && close(self.ky, other.ky)
            && close(self.sy, other.sy)
            && close(self.ty, other.ty)
    }
}

/// Number of clockwise quarter turns if `degrees` is a multiple of 90.
fn quarter_turns(degrees: f64) -> Option<u8> {
    let turns = degrees / 90.0;
    if !turns.is_finite() || Float::fract(turns) != 0.0 {
        return None;
    }
    Some((turns as i64).rem_euclid(4) as u8)
}
