//! Document crop geometry: four corners against an oriented image.
//!
//! Pure geometry. No pixel operations, no allocations, `no_std` compatible.
//!
//! # Modules
//!
//! - [`orientation`]: EXIF orientation, its affine matrix, rotate/flip steps
//! - [`crop`]: stored corners, re-projection across orientation changes,
//!   mapping to display space and back
//! - [`corners`]: corners form vs. cutout form, canonical ordering
//! - [`tracker`]: which displayed point stands for which stored corner
//! - [`controller`]: pointer drag state machine and outline validation
//! - [`session`]: applying background load and detection results
//!
//! # Example
//!
//! ```
//! use zencrop::{
//!     ControllerConfig, CropController, CropGeometry, ImageInfo, PointF, PointerEvent,
//! };
//!
//! let mut crop = CropGeometry::from_image(&ImageInfo::new(1000, 2000, 1))?;
//! crop.expand();
//!
//! let mut view = CropController::new(ControllerConfig::new().touch_radius(20.0));
//! view.set_geometry(Some(crop));
//! view.pointer(PointerEvent::Down(PointF::new(995.0, 5.0)));
//! view.pointer(PointerEvent::Move(PointF::new(900.0, 50.0)));
//! view.pointer(PointerEvent::Up(PointF::new(900.0, 50.0)));
//!
//! let crop = view.take_geometry().unwrap();
//! assert_eq!(crop.corners().unwrap().0[1], zencrop::Point::new(905, 45));
//! # Ok::<(), zencrop::CropError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod corners;
pub mod crop;
pub mod error;
pub mod geometry;
pub mod orientation;
pub mod session;
pub mod tracker;
pub mod transform;

pub use controller::{
    ControllerConfig, ConvexQuadValidator, CropController, CutoutFrame, CutoutValidator,
    PointerEvent,
};
pub use corners::{CornerSlot, Corners, Cutout, canonical_order};
pub use crop::CropGeometry;
pub use error::CropError;
pub use geometry::{Point, PointF, RectF, Size};
pub use orientation::Orientation;
pub use session::{
    CropSession, Detection, DetectionOutcome, ImageInfo, LoadTicket, detect_ok, full_image_corners,
};
pub use tracker::{CorrespondenceTracker, CutoutHandle, MappedCutout};
pub use transform::Transform;
