//! Errors returned at the crate boundary.
//!
//! Only input coming from outside (decoded image metadata, detector output)
//! is checked with `Result`. Violations of internal invariants, such as a
//! singular orientation matrix, panic.

use thiserror::Error;

/// Crop geometry error.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CropError {
    /// Raw EXIF orientation outside `0..=8`.
    #[error("invalid EXIF orientation: {0}")]
    InvalidOrientation(u8),

    /// Source image has zero width or height.
    #[error("invalid image dimensions: {width}x{height}")]
    ZeroImageDimension { width: u32, height: u32 },

    /// A corner set was built from the wrong number of points.
    #[error("expected {expected} corner points, got {actual}")]
    CornerCount { expected: usize, actual: usize },
}
