//! Hand-off points between background image work and the crop geometry.
//!
//! Loading and corner detection happen elsewhere, usually on another thread.
//! Their results come back as plain values and are applied here. A
//! [`LoadTicket`] ties each result to the load that started it, so a slow
//! completion for an image the user already left is dropped instead of
//! replacing what is on screen.

use crate::corners::Corners;
use crate::crop::CropGeometry;
use crate::error::CropError;
use crate::geometry::{Point, Size};
use crate::orientation::Orientation;

/// Decoded image metadata, as reported by the loader.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageInfo {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Raw EXIF orientation tag, `0..=8`.
    pub exif_orientation: u8,
}

impl ImageInfo {
    pub const fn new(pixel_width: u32, pixel_height: u32, exif_orientation: u8) -> Self {
        Self {
            pixel_width,
            pixel_height,
            exif_orientation,
        }
    }

    /// Bitmap size. Both dimensions must be non-zero.
    pub fn size(&self) -> Result<Size, CropError> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(CropError::ZeroImageDimension {
                width: self.pixel_width,
                height: self.pixel_height,
            });
        }
        Ok(Size::new(self.pixel_width, self.pixel_height))
    }

    pub fn orientation(&self) -> Result<Orientation, CropError> {
        Orientation::try_from(self.exif_orientation)
    }
}

/// Corner detector output for one image, in oriented pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    pub corners: Corners<Point>,
    /// High-confidence result that needs no manual confirmation.
    pub smart_crop: bool,
}

/// How a detection result was applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// Corners set; processing may continue without the user.
    Smart,
    /// Corners set; the user should confirm them.
    Manual,
    /// No corners; geometry unchanged.
    NotFound,
    /// Result belongs to a superseded load; nothing applied.
    Stale,
}

/// Corners spanning the whole oriented image, for when no detector is
/// available.
pub fn full_image_corners(info: &ImageInfo) -> Result<Corners<Point>, CropError> {
    let size = info.size()?;
    let oriented = info.orientation()?.transform_dimensions(size.width, size.height);
    Ok(Corners::full(oriented))
}

/// Acceptance check for a low-confidence detection. Accepts everything;
/// the edge-strength thresholds are not applied.
pub fn detect_ok(_detection: &Detection) -> bool {
    true
}

/// Identifies one load request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// The geometry of the image currently being cropped, plus bookkeeping
/// for loads in flight.
#[derive(Clone, Debug, Default)]
pub struct CropSession {
    current: u64,
    geometry: Option<CropGeometry>,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load. Tickets from earlier loads become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.current += 1;
        LoadTicket(self.current)
    }

    /// Whether `ticket` is from the most recent load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }

    /// Install fresh geometry for a loaded image.
    ///
    /// Returns `Ok(false)` and leaves the session alone when `ticket` is
    /// stale. Invalid image info is an error even for a stale ticket.
    pub fn finish_load(&mut self, ticket: LoadTicket, info: &ImageInfo) -> Result<bool, CropError> {
        let geometry = CropGeometry::from_image(info)?;
        if !self.is_current(ticket) {
            log::debug!(
                "dropping load {} of {}x{}, current is {}",
                ticket.0,
                info.pixel_width,
                info.pixel_height,
                self.current
            );
            return Ok(false);
        }
        self.geometry = Some(geometry);
        Ok(true)
    }

    /// Apply a detector result to the loaded geometry.
    pub fn apply_detection(
        &mut self,
        ticket: LoadTicket,
        detection: Option<Detection>,
    ) -> DetectionOutcome {
        if !self.is_current(ticket) {
            log::debug!("dropping detection for load {}, current is {}", ticket.0, self.current);
            return DetectionOutcome::Stale;
        }
        let Some(geometry) = self.geometry.as_mut() else {
            log::debug!("detection for load {} arrived before the image", ticket.0);
            return DetectionOutcome::Stale;
        };
        match detection {
            Some(d) if d.smart_crop => {
                geometry.set_corners(d.corners);
                DetectionOutcome::Smart
            }
            Some(d) if detect_ok(&d) => {
                geometry.set_corners(d.corners);
                DetectionOutcome::Manual
            }
            _ => DetectionOutcome::NotFound,
        }
    }

    pub fn geometry(&self) -> Option<&CropGeometry> {
        self.geometry.as_ref()
    }

    pub fn geometry_mut(&mut self) -> Option<&mut CropGeometry> {
        self.geometry.as_mut()
    }

    /// Swap in geometry built elsewhere. Loads in flight become stale.
    pub fn replace(&mut self, geometry: CropGeometry) -> Option<CropGeometry> {
        self.current += 1;
        self.geometry.replace(geometry)
    }

    /// End the session for the current image.
    pub fn take(&mut self) -> Option<CropGeometry> {
        self.current += 1;
        self.geometry.take()
    }
}
