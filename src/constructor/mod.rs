use tracing::debug;

use crate::error::GraphError;
use crate::graph::{BarId, BarMaterial, ConnectivityGraph, PointId};
use crate::grid::GridSurface;
use crate::math::{CameraLens, Point2, Point3, Pose, TOLERANCE};

/// Which pointer button an event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Confirm / place (left-click equivalent).
    Primary,
    /// Cancel (right-click equivalent).
    Secondary,
}

/// A pointer-down event in screen space.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    /// Button designation.
    pub button: PointerButton,
    /// Screen-space position in pixels.
    pub position: Point2,
}

impl PointerEvent {
    /// Creates a new pointer event.
    #[must_use]
    pub fn new(button: PointerButton, position: Point2) -> Self {
        Self { button, position }
    }
}

/// Placement state of the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructorState {
    /// No segment in progress.
    #[default]
    Idle,
    /// A provisional segment exists; its free end follows the cursor.
    Placing {
        /// The provisional bar.
        bar: BarId,
        /// The fixed end of the segment.
        start: PointId,
        /// The free end being dragged.
        end: PointId,
    },
}

/// Interactive state machine that builds points and bars from pointer
/// events, snapping placement through a [`GridSurface`].
///
/// Holds only the ids of the in-progress entities; the graph owns their
/// lifetime. Committing a segment immediately begins the next one from
/// the committed end point, so successive clicks lay a chain of bars
/// without re-arming placement.
#[derive(Debug, Default)]
pub struct SegmentConstructor {
    state: ConstructorState,
    material: Option<BarMaterial>,
}

impl SegmentConstructor {
    /// Creates a constructor with no material limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a constructor whose commits are validated against the
    /// given material's segment length limit.
    #[must_use]
    pub fn with_material(material: BarMaterial) -> Self {
        Self {
            state: ConstructorState::Idle,
            material: Some(material),
        }
    }

    /// Current placement state.
    #[must_use]
    pub fn state(&self) -> ConstructorState {
        self.state
    }

    /// Returns `true` while a provisional segment exists.
    #[must_use]
    pub fn is_placing(&self) -> bool {
        matches!(self.state, ConstructorState::Placing { .. })
    }

    /// Resolves a screen position to a snapped world position on the grid
    /// surface. `None` when the view ray misses the grid.
    #[must_use]
    pub fn resolve_screen_position(
        &self,
        screen: &Point2,
        view: &Pose,
        lens: &CameraLens,
        grid: &GridSurface,
    ) -> Option<Point3> {
        let ray = lens.screen_ray(view, screen).ok()?;
        let hit = grid.raycast(&ray)?;
        Some(grid.nearest_grid_point(&hit))
    }

    /// Feeds one pointer-down event through the state machine.
    ///
    /// Primary while idle starts a segment; primary while placing commits
    /// it and chains the next one; secondary while placing cancels.
    /// Events whose view ray misses the grid are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DegenerateSegment`] for a zero-length commit
    /// and [`GraphError::SegmentTooLong`] when the material limit is
    /// exceeded. Either way the constructor stays in its current state
    /// and the graph is unchanged, so the player may simply try again.
    pub fn handle_pointer_down(
        &mut self,
        event: &PointerEvent,
        view: &Pose,
        lens: &CameraLens,
        grid: &GridSurface,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), GraphError> {
        match (self.state, event.button) {
            (ConstructorState::Idle, PointerButton::Primary) => {
                if let Some(position) =
                    self.resolve_screen_position(&event.position, view, lens, grid)
                {
                    self.begin_segment(position, graph)?;
                }
                Ok(())
            }
            (ConstructorState::Idle, PointerButton::Secondary) => Ok(()),
            (ConstructorState::Placing { .. }, PointerButton::Primary) => {
                self.commit_and_chain(graph)
            }
            (ConstructorState::Placing { bar, .. }, PointerButton::Secondary) => {
                self.state = ConstructorState::Idle;
                graph.remove_bar(bar)
            }
        }
    }

    /// Moves the free end of the in-progress segment to follow the
    /// cursor; called once per tick while placing. A visual preview
    /// update, not a state transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-progress point has vanished from the
    /// graph, which indicates the graph was mutated behind the
    /// constructor's back.
    pub fn update_preview(
        &mut self,
        cursor: &Point2,
        view: &Pose,
        lens: &CameraLens,
        grid: &GridSurface,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), GraphError> {
        if let ConstructorState::Placing { end, .. } = self.state {
            if let Some(position) = self.resolve_screen_position(cursor, view, lens, grid) {
                graph.move_point(end, position)?;
            }
        }
        Ok(())
    }

    /// Discards any in-progress segment and returns to idle. Used by
    /// session teardown as an implicit cancel.
    ///
    /// # Errors
    ///
    /// Returns an error if the provisional bar was already gone; the
    /// constructor still ends up idle.
    pub fn force_cancel(&mut self, graph: &mut ConnectivityGraph) -> Result<(), GraphError> {
        if let ConstructorState::Placing { bar, .. } = self.state {
            self.state = ConstructorState::Idle;
            graph.remove_bar(bar)?;
        }
        Ok(())
    }

    fn begin_segment(
        &mut self,
        position: Point3,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), GraphError> {
        let start = graph.add_point(position, false);
        let end = graph.add_point(position, false);
        let bar = graph.create_provisional_bar(start, end)?;
        self.state = ConstructorState::Placing { bar, start, end };
        debug!(?start, ?end, "segment placement started");
        Ok(())
    }

    fn commit_and_chain(&mut self, graph: &mut ConnectivityGraph) -> Result<(), GraphError> {
        let ConstructorState::Placing { bar, end, .. } = self.state else {
            return Ok(());
        };

        let length = graph.bar(bar)?.length();
        if length < TOLERANCE {
            return Err(GraphError::DegenerateSegment);
        }
        if let Some(material) = &self.material {
            if !material.allows_length(length) {
                return Err(GraphError::SegmentTooLong {
                    length,
                    max: material.max_length(),
                });
            }
        }

        // The committed end point becomes the fixed start of the next
        // segment, same identity.
        let position = *graph.point(end)?.position();
        let next_end = graph.add_point(position, false);
        let next_bar = graph.create_provisional_bar(end, next_end)?;
        self.state = ConstructorState::Placing {
            bar: next_bar,
            start: end,
            end: next_end,
        };
        debug!(committed = ?bar, length, "segment committed, chaining");
        Ok(())
    }
}
