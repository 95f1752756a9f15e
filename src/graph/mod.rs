pub mod bar;
pub mod material;
pub mod point;

pub use bar::{BarData, BarId};
pub use material::{BarMaterial, BuildCost};
pub use point::{PointData, PointId};

use slotmap::SlotMap;

use crate::error::GraphError;
use crate::math::{snap, Point3, TOLERANCE};

/// Lattice step designer-placed persistent points are snapped to.
const PERSISTENT_LATTICE_STEP: f64 = 1.0;

/// Central arena that owns all points and bars of a built structure.
///
/// Points and bars reference each other via typed IDs (generational
/// indices), avoiding self-referential structures and enabling safe
/// mutation. A bar always references exactly two live points; a point's
/// incident set exactly mirrors the bars that reference it.
#[derive(Debug, Default)]
pub struct ConnectivityGraph {
    points: SlotMap<PointId, PointData>,
    bars: SlotMap<BarId, BarData>,
}

impl ConnectivityGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Inserts a point and returns its ID.
    ///
    /// Persistent points (designer-placed, expected to survive losing all
    /// incident bars) are snapped to the unit lattice on insertion.
    /// Runtime points arrive already grid-snapped and are stored as given.
    pub fn add_point(&mut self, position: Point3, persistent: bool) -> PointId {
        let position = if persistent {
            snap::round_to_lattice(&position, PERSISTENT_LATTICE_STEP)
        } else {
            position
        };
        self.points.insert(PointData::new(position, persistent))
    }

    /// Returns a reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not present in the graph.
    pub fn point(&self, id: PointId) -> Result<&PointData, GraphError> {
        self.points
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("point".into()))
    }

    /// Returns `true` if the point is present in the graph.
    #[must_use]
    pub fn contains_point(&self, id: PointId) -> bool {
        self.points.contains_key(id)
    }

    /// Moves a point and refreshes the cached endpoint positions of every
    /// incident bar. Used for the live preview drag of an in-progress
    /// segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not present in the graph.
    pub fn move_point(&mut self, id: PointId, position: Point3) -> Result<(), GraphError> {
        let point = self
            .points
            .get_mut(id)
            .ok_or_else(|| GraphError::EntityNotFound("point".into()))?;
        point.set_position(position);
        let incident: Vec<BarId> = point.bars().to_vec();
        for bar_id in incident {
            if let Some(bar) = self.bars.get_mut(bar_id) {
                bar.refresh_endpoint(id, position);
            }
        }
        Ok(())
    }

    // --- Bar operations ---

    /// Creates a committed bar between two existing points.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DegenerateSegment`] if both endpoints are the
    /// same point or their positions coincide within tolerance, and
    /// [`GraphError::EntityNotFound`] if either point is missing. On error
    /// the graph is left unchanged.
    pub fn create_bar(&mut self, a: PointId, b: PointId) -> Result<BarId, GraphError> {
        if a == b {
            return Err(GraphError::DegenerateSegment);
        }
        let pos_a = *self.point(a)?.position();
        let pos_b = *self.point(b)?.position();
        if (pos_b - pos_a).norm() < TOLERANCE {
            return Err(GraphError::DegenerateSegment);
        }
        Ok(self.insert_bar(a, b, pos_a, pos_b))
    }

    /// Creates a provisional bar whose endpoints may still coincide.
    ///
    /// A segment under construction starts with both endpoints on the same
    /// lattice point; the free end is dragged away before commit. The
    /// degenerate-length check is therefore deferred to commit time — only
    /// endpoint identity is rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DegenerateSegment`] if both endpoints are the
    /// same point, and [`GraphError::EntityNotFound`] if either point is
    /// missing.
    pub fn create_provisional_bar(&mut self, a: PointId, b: PointId) -> Result<BarId, GraphError> {
        if a == b {
            return Err(GraphError::DegenerateSegment);
        }
        let pos_a = *self.point(a)?.position();
        let pos_b = *self.point(b)?.position();
        Ok(self.insert_bar(a, b, pos_a, pos_b))
    }

    fn insert_bar(&mut self, a: PointId, b: PointId, pos_a: Point3, pos_b: Point3) -> BarId {
        let id = self.bars.insert(BarData::new(a, b, pos_a, pos_b));
        if let Some(point) = self.points.get_mut(a) {
            point.attach_bar(id);
        }
        if let Some(point) = self.points.get_mut(b) {
            point.attach_bar(id);
        }
        id
    }

    /// Returns a reference to the bar data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the bar is not present in the graph.
    pub fn bar(&self, id: BarId) -> Result<&BarData, GraphError> {
        self.bars
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("bar".into()))
    }

    /// Removes a bar, detaching it from both endpoints. An endpoint left
    /// with no incident bars is removed with it unless it is persistent.
    ///
    /// This is the single code path for "a point becomes unreachable":
    /// both normal deletion and cancelling an in-progress segment go
    /// through here.
    ///
    /// # Errors
    ///
    /// Returns an error if the bar is not present in the graph.
    pub fn remove_bar(&mut self, id: BarId) -> Result<(), GraphError> {
        let bar = self
            .bars
            .remove(id)
            .ok_or_else(|| GraphError::EntityNotFound("bar".into()))?;
        for endpoint in [bar.start(), bar.end()] {
            if let Some(point) = self.points.get_mut(endpoint) {
                point.detach_bar(id);
                if point.bars().is_empty() && !point.is_persistent() {
                    let _ = self.points.remove(endpoint);
                }
            }
        }
        Ok(())
    }

    // --- Queries ---

    /// Iterates over all points with their IDs.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &PointData)> {
        self.points.iter()
    }

    /// Iterates over all bars with their IDs.
    pub fn bars(&self) -> impl Iterator<Item = (BarId, &BarData)> {
        self.bars.iter()
    }

    /// Number of points in the graph.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of bars in the graph.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Returns `true` if the graph holds no points and no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.bars.is_empty()
    }

    /// Total resource cost of the structure under the given material.
    #[must_use]
    pub fn total_cost(&self, material: &BarMaterial) -> BuildCost {
        let n = u32::try_from(self.bars.len()).unwrap_or(u32::MAX);
        BuildCost {
            wood: n.saturating_mul(material.wood_cost()),
            metal: n.saturating_mul(material.metal_cost()),
        }
    }

    /// Total structural mass under the given material.
    #[must_use]
    pub fn total_mass(&self, material: &BarMaterial) -> f64 {
        self.bars
            .values()
            .map(|bar| material.mass_of(bar.length()))
            .sum()
    }
}
