use crate::math::Point3;

use super::bar::BarId;

slotmap::new_key_type! {
    /// Unique identifier for a point in the connectivity graph.
    pub struct PointId;
}

/// Data associated with a structural point: one shared endpoint of one or
/// more bars.
///
/// The incident-bar set mirrors exactly which bars reference this point as
/// an endpoint. It is maintained by graph operations only, never mutated
/// independently.
#[derive(Debug, Clone)]
pub struct PointData {
    position: Point3,
    persistent: bool,
    bars: Vec<BarId>,
}

impl PointData {
    pub(super) fn new(position: Point3, persistent: bool) -> Self {
        Self {
            position,
            persistent,
            bars: Vec::new(),
        }
    }

    /// The grid-snapped world position of the point.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Whether this point survives losing its last incident bar.
    /// Designer-placed points are persistent; points created during a build
    /// session are not.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The bars incident to this point, unordered, without duplicates.
    #[must_use]
    pub fn bars(&self) -> &[BarId] {
        &self.bars
    }

    pub(super) fn set_position(&mut self, position: Point3) {
        self.position = position;
    }

    pub(super) fn attach_bar(&mut self, bar: BarId) {
        if !self.bars.contains(&bar) {
            self.bars.push(bar);
        }
    }

    pub(super) fn detach_bar(&mut self, bar: BarId) {
        self.bars.retain(|b| *b != bar);
    }
}
