//! Correspondence between displayed cutout points and stored corner slots.
//!
//! The display-space cutout is rebuilt from scratch whenever the geometry
//! or the view transform changes, so "the corner under the finger" has to
//! be re-found in every new array. Each [`MappedCutout`] gets a fresh
//! generation; a [`CutoutHandle`] names one point of one generation. The
//! tracker keeps the handle → [`CornerSlot`] association for the live
//! generation only, which is all a drag ever needs: resolve the old handle
//! to its slot, map a new cutout, then look the slot up in it.

use crate::corners::{CornerSlot, Cutout};
use crate::geometry::PointF;

/// Identity of one displayed point: which cutout it came from, and where
/// in that cutout it sits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CutoutHandle {
    generation: u32,
    index: u8,
}

impl CutoutHandle {
    /// Position in the cutout this handle belongs to.
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Display-space cutout produced by one mapping pass.
///
/// Holds owned copies of the points; edits here never reach the stored
/// corners except through an explicit commit.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedCutout {
    generation: u32,
    points: Cutout<PointF>,
}

impl MappedCutout {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Points in canonical cutout order.
    pub fn points(&self) -> &[PointF; 4] {
        &self.points.0
    }

    pub fn cutout(&self) -> Cutout<PointF> {
        self.points
    }

    /// Handle for the point at `index`, if in range.
    pub fn handle(&self, index: usize) -> Option<CutoutHandle> {
        (index < 4).then_some(CutoutHandle {
            generation: self.generation,
            index: index as u8,
        })
    }

    pub fn handles(&self) -> [CutoutHandle; 4] {
        [0u8, 1, 2, 3].map(|index| CutoutHandle {
            generation: self.generation,
            index,
        })
    }

    /// Whether `handle` was issued for this cutout.
    pub fn contains(&self, handle: CutoutHandle) -> bool {
        handle.generation == self.generation && handle.index() < 4
    }

    /// Position of `handle`, or `None` if it belongs to another cutout.
    pub fn get(&self, handle: CutoutHandle) -> Option<PointF> {
        self.contains(handle).then(|| self.points.0[handle.index()])
    }

    /// Move the point behind `handle` by `delta`. Returns `false` for a
    /// handle from another cutout.
    pub fn offset(&mut self, handle: CutoutHandle, delta: PointF) -> bool {
        if !self.contains(handle) {
            return false;
        }
        let p = &mut self.points.0[handle.index()];
        *p = *p + delta;
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Association {
    display: CutoutHandle,
    slot: CornerSlot,
}

/// Fixed table of (displayed point, corner slot) associations.
#[derive(Clone, Debug, Default)]
pub struct CorrespondenceTracker {
    live: Option<u32>,
    next_generation: u32,
    entries: [Option<Association>; 4],
}

impl CorrespondenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop associations whose displayed point is no longer live.
    pub fn prune(&mut self) {
        let live = self.live;
        for entry in &mut self.entries {
            if entry.is_some_and(|a| Some(a.display.generation) != live) {
                *entry = None;
            }
        }
    }

    /// Forget the association for one displayed point.
    /// Returns `false` if there was none.
    pub fn invalidate(&mut self, handle: CutoutHandle) -> bool {
        for entry in &mut self.entries {
            if entry.is_some_and(|a| a.display == handle) {
                *entry = None;
                return true;
            }
        }
        false
    }

    /// Forget everything, including the live generation.
    pub fn clear(&mut self) {
        self.entries = [None; 4];
        self.live = None;
    }

    /// Number of live associations.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a new generation for `points`, associating position `i`
    /// with `slots[i]`.
    pub fn record_all(&mut self, points: Cutout<PointF>, slots: [CornerSlot; 4]) -> MappedCutout {
        self.prune();
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.live = Some(generation);
        for (index, (entry, slot)) in self.entries.iter_mut().zip(slots).enumerate() {
            *entry = Some(Association {
                display: CutoutHandle {
                    generation,
                    index: index as u8,
                },
                slot,
            });
        }
        MappedCutout { generation, points }
    }

    /// Corner slot behind a displayed point.
    pub fn find_native_slot(&mut self, handle: CutoutHandle) -> Option<CornerSlot> {
        self.prune();
        self.entries
            .iter()
            .flatten()
            .find(|a| a.display == handle)
            .map(|a| a.slot)
    }

    /// Displayed point in `cutout` that stands for `slot`.
    pub fn find_display_point(
        &mut self,
        cutout: &MappedCutout,
        slot: CornerSlot,
    ) -> Option<CutoutHandle> {
        self.prune();
        self.entries
            .iter()
            .flatten()
            .find(|a| a.slot == slot && cutout.contains(a.display))
            .map(|a| a.display)
    }
}
