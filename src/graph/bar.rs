use crate::math::{Point3, Vector3};

use super::point::PointId;

slotmap::new_key_type! {
    /// Unique identifier for a bar in the connectivity graph.
    pub struct BarId;
}

/// Data associated with a structural bar: one linear segment between two
/// points.
///
/// Endpoint order only matters for construction-time "current end"
/// tracking; graph semantics treat the pair as unordered. World positions
/// of both endpoints are cached here so renderers never chase ids.
#[derive(Debug, Clone)]
pub struct BarData {
    start: PointId,
    end: PointId,
    start_position: Point3,
    end_position: Point3,
}

impl BarData {
    pub(super) fn new(
        start: PointId,
        end: PointId,
        start_position: Point3,
        end_position: Point3,
    ) -> Self {
        Self {
            start,
            end,
            start_position,
            end_position,
        }
    }

    /// Start endpoint of the bar.
    #[must_use]
    pub fn start(&self) -> PointId {
        self.start
    }

    /// End endpoint of the bar.
    #[must_use]
    pub fn end(&self) -> PointId {
        self.end
    }

    /// Cached world position of the start endpoint.
    #[must_use]
    pub fn start_position(&self) -> &Point3 {
        &self.start_position
    }

    /// Cached world position of the end endpoint.
    #[must_use]
    pub fn end_position(&self) -> &Point3 {
        &self.end_position
    }

    /// Physical length of the bar, derived from the cached endpoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end_position - self.start_position).norm()
    }

    /// Vector from start to end.
    #[must_use]
    pub fn span(&self) -> Vector3 {
        self.end_position - self.start_position
    }

    /// Returns `true` if the given point is one of this bar's endpoints.
    #[must_use]
    pub fn has_endpoint(&self, point: PointId) -> bool {
        self.start == point || self.end == point
    }

    pub(super) fn refresh_endpoint(&mut self, point: PointId, position: Point3) {
        if self.start == point {
            self.start_position = position;
        }
        if self.end == point {
            self.end_position = position;
        }
    }
}
