//! Pointer-driven corner editing on top of [`CropGeometry`].
//!
//! The controller owns the geometry while it is on screen, rebuilds the
//! display cutout whenever anything changes, and runs the drag state
//! machine:
//!
//! ```text
//!   Idle ──Down near a corner──▶ Dragging ──Move──▶ Dragging
//!    ▲                              │
//!    └──────── Up (commit) / Cancel ┘
//! ```
//!
//! A drag only renders its offset until `Up`; the stored corner changes
//! once, at commit time.

use crate::corners::Corners;
use crate::crop::CropGeometry;
use crate::geometry::{Point, PointF, RectF, Size};
use crate::tracker::{CorrespondenceTracker, CutoutHandle, MappedCutout};
use crate::transform::Transform;

/// Decides whether a displayed corner set is an acceptable document outline.
///
/// `corners` are in corners form, relative to the image bounds' top-left,
/// and `bounds` is the rounded-out size of the displayed image.
pub trait CutoutValidator {
    fn validate(&self, corners: &Corners<Point>, bounds: Size) -> bool;
}

impl<F> CutoutValidator for F
where
    F: Fn(&Corners<Point>, Size) -> bool,
{
    fn validate(&self, corners: &Corners<Point>, bounds: Size) -> bool {
        self(corners, bounds)
    }
}

/// Accepts strictly convex quadrilaterals inside the bounds whose area
/// exceeds a minimum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ConvexQuadValidator {
    min_area: f64,
}

impl ConvexQuadValidator {
    pub fn new(min_area: f64) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }
}

impl CutoutValidator for ConvexQuadValidator {
    fn validate(&self, corners: &Corners<Point>, bounds: Size) -> bool {
        let (w, h) = (i64::from(bounds.width), i64::from(bounds.height));
        let inside = corners.0.iter().all(|p| {
            let (x, y) = (i64::from(p.x), i64::from(p.y));
            (0..=w).contains(&x) && (0..=h).contains(&y)
        });
        if !inside {
            return false;
        }

        let ring = corners.into_cutout().0;
        let mut turns = [0i64; 4];
        let mut doubled_area = 0i64;
        for i in 0..4 {
            let (a, b, c) = (ring[i], ring[(i + 1) % 4], ring[(i + 2) % 4]);
            turns[i] = cross(a, b, c);
            doubled_area += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
        }
        let convex = turns.iter().all(|t| *t > 0) || turns.iter().all(|t| *t < 0);
        convex && doubled_area.unsigned_abs() as f64 / 2.0 > self.min_area
    }
}

fn cross(a: Point, b: Point, c: Point) -> i64 {
    let (abx, aby) = (i64::from(b.x - a.x), i64::from(b.y - a.y));
    let (bcx, bcy) = (i64::from(c.x - b.x), i64::from(c.y - b.y));
    abx * bcy - aby * bcx
}

/// Controller tuning.
///
/// ```
/// use zencrop::ControllerConfig;
///
/// let config = ControllerConfig::new().touch_radius(24.0).min_area(400.0);
/// assert_eq!(config.radius(), Some(24.0));
/// assert_eq!(ControllerConfig::new().radius(), None);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerConfig {
    touch_radius: Option<f64>,
    min_area: f64,
}

impl ControllerConfig {
    /// Nearest corner always wins, no minimum area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only pick up corners strictly closer than `px` to the pointer.
    pub fn touch_radius(mut self, px: f64) -> Self {
        self.touch_radius = Some(px);
        self
    }

    /// Pick up the nearest corner at any distance.
    pub fn any_distance(mut self) -> Self {
        self.touch_radius = None;
        self
    }

    /// Minimum outline area, in display pixels², for [`ConvexQuadValidator`].
    pub fn min_area(mut self, px2: f64) -> Self {
        self.min_area = px2;
        self
    }

    /// Configured touch radius, `None` when disabled.
    pub fn radius(&self) -> Option<f64> {
        self.touch_radius
    }

    pub fn area_threshold(&self) -> f64 {
        self.min_area
    }
}

/// Pointer input, in display coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Down(PointF),
    Move(PointF),
    Up(PointF),
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        handle: CutoutHandle,
        start: PointF,
        /// `None` until the first move; a tap never commits.
        delta: Option<PointF>,
    },
}

/// What a renderer needs for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CutoutFrame {
    /// Outline in display space, canonical cutout order, drag offset applied.
    pub points: [PointF; 4],
    /// Index into `points` of the corner being dragged.
    pub active: Option<usize>,
    /// The validator rejected this outline.
    pub invalid: bool,
    /// Displayed image bounds.
    pub bounds: RectF,
}

/// Interactive corner editor.
#[derive(Clone, Debug)]
pub struct CropController<V = ConvexQuadValidator> {
    config: ControllerConfig,
    validator: V,
    geometry: Option<CropGeometry>,
    initial: Option<CropGeometry>,
    display: Transform,
    scaled: Option<Size>,
    tracker: CorrespondenceTracker,
    cutout: Option<MappedCutout>,
    bounds: Option<RectF>,
    invalid: bool,
    drag: DragState,
}

impl CropController {
    /// Controller validating with [`ConvexQuadValidator`] at the
    /// configured minimum area.
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_validator(config, ConvexQuadValidator::new(config.min_area))
    }
}

impl<V: CutoutValidator> CropController<V> {
    pub fn with_validator(config: ControllerConfig, validator: V) -> Self {
        Self {
            config,
            validator,
            geometry: None,
            initial: None,
            display: Transform::IDENTITY,
            scaled: None,
            tracker: CorrespondenceTracker::new(),
            cutout: None,
            bounds: None,
            invalid: false,
            drag: DragState::Idle,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Show `geometry`, remembering it for [`revert_selection`](Self::revert_selection).
    pub fn set_geometry(&mut self, geometry: Option<CropGeometry>) {
        self.initial = geometry.clone();
        self.geometry = geometry;
        self.tracker.clear();
        self.cutout = None;
        self.drag = DragState::Idle;
        self.rebuild();
    }

    pub fn geometry(&self) -> Option<&CropGeometry> {
        self.geometry.as_ref()
    }

    /// Hand the edited geometry back, leaving the controller empty.
    pub fn take_geometry(&mut self) -> Option<CropGeometry> {
        let geometry = self.geometry.take();
        self.set_geometry(None);
        geometry
    }

    /// Set the oriented-space → display transform, and the size of the
    /// displayed bitmap before orientation when it is a downscaled copy.
    pub fn set_display_transform(&mut self, display: Transform, scaled: Option<Size>) {
        self.display = display;
        self.scaled = scaled;
        self.rebuild();
    }

    pub fn display_transform(&self) -> Transform {
        self.display
    }

    pub fn rotate_right(&mut self) {
        self.edit(CropGeometry::rotate_right);
    }

    pub fn rotate_left(&mut self) {
        self.edit(CropGeometry::rotate_left);
    }

    /// Restore the corners the geometry had when it was set, expressed in
    /// the current orientation.
    pub fn revert_selection(&mut self) {
        let initial = self.initial.clone();
        self.edit(|geometry| {
            let Some(mut initial) = initial else {
                return;
            };
            initial.set_orientation(geometry.orientation());
            match initial.corners() {
                Some(corners) => geometry.set_corners(*corners),
                None => geometry.reset(),
            }
        });
    }

    /// Select the whole image.
    pub fn expand_selection(&mut self) {
        self.edit(CropGeometry::expand);
    }

    /// Whether the current outline failed validation.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Current render snapshot, `None` when there is nothing to outline.
    pub fn frame(&self) -> Option<CutoutFrame> {
        let cutout = self.cutout.as_ref()?;
        let active = match self.drag {
            DragState::Dragging { handle, .. } if cutout.contains(handle) => Some(handle.index()),
            _ => None,
        };
        Some(CutoutFrame {
            points: *cutout.points(),
            active,
            invalid: self.invalid,
            bounds: self.bounds.unwrap_or_default(),
        })
    }

    /// Displayed corner nearest `position`, within the touch radius if one
    /// is configured. The first of equally near corners wins.
    pub fn find_cutout_item(&self, position: PointF) -> Option<CutoutHandle> {
        let cutout = self.cutout.as_ref()?;
        let mut nearest = self.config.touch_radius.unwrap_or(f64::INFINITY);
        let mut found = None;
        for (handle, point) in cutout.handles().into_iter().zip(cutout.points()) {
            let d = point.distance(position);
            if d < nearest {
                nearest = d;
                found = Some(handle);
            }
        }
        found
    }

    /// Feed one pointer event. Returns whether it was part of a corner drag.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        match (event, self.drag) {
            (PointerEvent::Down(position), _) => {
                self.drag = match self.find_cutout_item(position) {
                    Some(handle) => DragState::Dragging {
                        handle,
                        start: position,
                        delta: None,
                    },
                    None => DragState::Idle,
                };
                self.rebuild();
                self.is_dragging()
            }
            (PointerEvent::Move(position), DragState::Dragging { handle, start, .. }) => {
                self.drag = DragState::Dragging {
                    handle,
                    start,
                    delta: Some(position - start),
                };
                self.rebuild();
                true
            }
            (
                PointerEvent::Up(position),
                DragState::Dragging {
                    handle,
                    start,
                    delta: Some(_),
                },
            ) => {
                self.drag = DragState::Dragging {
                    handle,
                    start,
                    delta: Some(position - start),
                };
                self.rebuild();
                self.commit();
                self.drag = DragState::Idle;
                self.rebuild();
                true
            }
            (PointerEvent::Up(_) | PointerEvent::Cancel, DragState::Dragging { .. }) => {
                self.drag = DragState::Idle;
                self.rebuild();
                true
            }
            (_, DragState::Idle) => false,
        }
    }

    /// Apply a geometry command. Ends any drag in progress without
    /// committing it.
    fn edit(&mut self, f: impl FnOnce(&mut CropGeometry)) {
        let Some(geometry) = self.geometry.as_mut() else {
            return;
        };
        f(geometry);
        self.drag = DragState::Idle;
        self.rebuild();
    }

    fn commit(&mut self) {
        let DragState::Dragging { handle, .. } = self.drag else {
            return;
        };
        let Some(point) = self.cutout.as_ref().and_then(|c| c.get(handle)) else {
            log::debug!("drag handle {handle:?} is not in the current cutout, nothing to commit");
            return;
        };
        let Some(slot) = self.tracker.find_native_slot(handle) else {
            log::debug!("drag handle {handle:?} has no corner slot, nothing to commit");
            return;
        };
        let Some(inverse) = self.display.invert() else {
            log::debug!("display transform is singular, dropping edit of {slot:?}");
            return;
        };
        if let Some(geometry) = self.geometry.as_mut() {
            geometry.commit_corner(slot, inverse.map_point(point), self.scaled);
        }
    }

    /// Rebuild the display cutout, carry the dragged corner into it, and
    /// re-run validation.
    fn rebuild(&mut self) {
        let carried = match self.drag {
            DragState::Dragging { handle, .. } => {
                let slot = self.tracker.find_native_slot(handle);
                if slot.is_none() {
                    log::debug!("stale drag handle {handle:?}, treating as no drag");
                }
                slot
            }
            DragState::Idle => None,
        };

        let mapped = self
            .geometry
            .as_ref()
            .and_then(|g| g.map_cutout(&self.display, self.scaled, &mut self.tracker));
        let Some(mut cutout) = mapped else {
            self.cutout = None;
            self.bounds = None;
            self.invalid = false;
            self.drag = DragState::Idle;
            return;
        };

        self.drag = match self.drag {
            DragState::Dragging { start, delta, .. } => {
                match carried.and_then(|slot| self.tracker.find_display_point(&cutout, slot)) {
                    Some(handle) => {
                        if let Some(delta) = delta {
                            cutout.offset(handle, delta);
                        }
                        DragState::Dragging {
                            handle,
                            start,
                            delta,
                        }
                    }
                    None => {
                        log::debug!("dragged corner missing from rebuilt cutout, releasing");
                        DragState::Idle
                    }
                }
            }
            DragState::Idle => DragState::Idle,
        };

        let bounds = self
            .geometry
            .as_ref()
            .map(|g| g.map_origin(&self.display, self.scaled))
            .unwrap_or_default();
        let relative = cutout
            .cutout()
            .into_corners()
            .map(|p| (p - bounds.origin()).round());
        self.invalid = !self.validator.validate(&relative, bounds.round_out_size());
        self.bounds = Some(bounds);
        self.cutout = Some(cutout);
    }
}
