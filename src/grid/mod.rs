pub mod mesh;

pub use mesh::GridMesh;

use std::f64::consts::FRAC_PI_2;

use tracing::warn;

use crate::error::GridError;
use crate::math::{snap, Point3, Pose, Ray, UnitQuat, Vector3, TOLERANCE};

/// Upper bound on grid extents in cells per axis. Keeps the mesh vertex
/// and triangle counts well inside the `u32` index space.
pub const MAX_GRID_EXTENT: u32 = 4096;

/// How the grid surface orients itself relative to the observation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowMode {
    /// The surface hangs in front of the camera and tracks it every tick,
    /// like a sheet of paper held up to the lens.
    #[default]
    FollowCamera,
    /// The surface lies flat at the build location and only yaws so its
    /// local forward axis points at the camera.
    StaticFacing,
}

/// Parameters for a snapping grid surface.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Size of each grid cell in world units.
    pub cell_size: f64,
    /// How many cells wide the plane is.
    pub width: u32,
    /// How many cells deep the plane is.
    pub depth: u32,
    /// Small lift along the plane normal to avoid z-fighting with the
    /// geometry the grid is drawn over.
    pub normal_offset: f64,
    /// Distance the plane hangs in front of the camera (follow mode).
    pub camera_distance: f64,
    /// Extra lift along world up applied to the anchor position.
    pub vertical_offset: f64,
    /// Whether re-anchoring eases toward the target pose or snaps to it.
    pub smooth_follow: bool,
    /// Easing rate for smooth re-anchoring, in units of 1/seconds.
    pub follow_rate: f64,
    /// Whether [`GridSurface::nearest_grid_point`] quantizes at all.
    pub snap_enabled: bool,
    /// Orientation strategy.
    pub follow_mode: FollowMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            width: 20,
            depth: 20,
            normal_offset: 0.02,
            camera_distance: 10.0,
            vertical_offset: 0.1,
            smooth_follow: true,
            follow_rate: 15.0,
            snap_enabled: true,
            follow_mode: FollowMode::FollowCamera,
        }
    }
}

impl GridConfig {
    /// Checks that the configuration describes a usable grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell size, camera distance or follow rate
    /// are not positive, or the extents fall outside
    /// `1..=`[`MAX_GRID_EXTENT`] cells per axis.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.cell_size <= 0.0 {
            return Err(GridError::InvalidParameters(
                "cell size must be positive".to_owned(),
            ));
        }
        if self.width == 0 || self.depth == 0 {
            return Err(GridError::InvalidParameters(
                "grid extents must be at least one cell".to_owned(),
            ));
        }
        if self.width > MAX_GRID_EXTENT || self.depth > MAX_GRID_EXTENT {
            return Err(GridError::InvalidParameters(format!(
                "grid extents capped at {MAX_GRID_EXTENT} cells per axis"
            )));
        }
        if self.camera_distance <= 0.0 {
            return Err(GridError::InvalidParameters(
                "camera distance must be positive".to_owned(),
            ));
        }
        if self.follow_rate <= 0.0 {
            return Err(GridError::InvalidParameters(
                "follow rate must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// A finite planar reference grid that answers nearest-lattice-point
/// queries in world space.
///
/// The mesh is generated once at initialization; only the anchor pose
/// moves afterwards, recomputed each tick from the observation point.
#[derive(Debug)]
pub struct GridSurface {
    config: GridConfig,
    mesh: Option<GridMesh>,
    location: Pose,
    anchor: Pose,
    active: bool,
}

impl GridSurface {
    /// Creates a surface from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self {
            config,
            mesh: None,
            location: Pose::identity(),
            anchor: Pose::identity(),
            active: false,
        })
    }

    /// Builds the plane mesh and anchors the surface at the build
    /// location, tracking the observation pose from now on.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoObservationPoint`] when no observation pose
    /// is available. The surface then stays inactive and snapping degrades
    /// to the identity; the caller's session entry should still proceed.
    pub fn initialize(
        &mut self,
        location: &Pose,
        observation: Option<&Pose>,
    ) -> Result<(), GridError> {
        self.location = *location;
        let Some(observation) = observation else {
            warn!("no active camera found, grid surface stays inactive");
            self.active = false;
            return Err(GridError::NoObservationPoint);
        };

        self.mesh = Some(GridMesh::generate(
            self.config.cell_size,
            self.config.width,
            self.config.depth,
            self.config.normal_offset,
        ));
        self.anchor = self.target_anchor(observation);
        self.active = true;
        Ok(())
    }

    /// Recomputes the anchor from the observation pose; one step of the
    /// per-tick follow update. Instantaneous or eased per configuration.
    pub fn update_follow(&mut self, dt: f64, observation: &Pose) {
        if !self.active {
            return;
        }
        let target = self.target_anchor(observation);
        if self.config.smooth_follow {
            self.anchor.step_toward(&target, self.config.follow_rate, dt);
        } else {
            self.anchor = target;
        }
    }

    fn target_anchor(&self, observation: &Pose) -> Pose {
        match self.config.follow_mode {
            FollowMode::FollowCamera => {
                let position = observation.position
                    + observation.forward() * self.config.camera_distance
                    + Vector3::y() * self.config.vertical_offset;
                // Tilt the plane 90 degrees about local X so its normal
                // points along the camera forward axis.
                let rotation = observation.rotation
                    * UnitQuat::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
                Pose::new(position, rotation)
            }
            FollowMode::StaticFacing => {
                let position =
                    self.location.position + Vector3::y() * self.config.vertical_offset;
                let toward = observation.position - self.location.position;
                let rotation = if toward.x.abs() < TOLERANCE && toward.z.abs() < TOLERANCE {
                    self.location.rotation
                } else {
                    let yaw = toward.x.atan2(toward.z);
                    UnitQuat::from_axis_angle(&Vector3::y_axis(), yaw)
                };
                Pose::new(position, rotation)
            }
        }
    }

    /// Quantizes a world position to the nearest lattice point of the
    /// surface.
    ///
    /// The input is transformed into the anchor frame, the two in-plane
    /// coordinates are rounded to multiples of the cell size, the
    /// off-plane coordinate is pinned to the configured normal offset, and
    /// the result is transformed back. Returns the input unchanged when
    /// snapping is disabled or the surface is inactive.
    #[must_use]
    pub fn nearest_grid_point(&self, world: &Point3) -> Point3 {
        if !self.active || !self.config.snap_enabled {
            return *world;
        }
        let iso = self.anchor.to_isometry();
        let mut local = iso.inverse_transform_point(world);
        local.x = snap::round_to_step(local.x, self.config.cell_size);
        local.z = snap::round_to_step(local.z, self.config.cell_size);
        local.y = self.config.normal_offset;
        iso.transform_point(&local)
    }

    /// Casts a ray onto the surface plane, returning the world-space hit
    /// point if it falls inside the grid extents.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Option<Point3> {
        if !self.active {
            return None;
        }
        let normal = self.anchor.up();
        let hit = ray.intersect_plane(&self.anchor.position, &normal)?;

        let local = self.anchor.to_isometry().inverse_transform_point(&hit);
        let half_width = f64::from(self.config.width) * self.config.cell_size * 0.5;
        let half_depth = f64::from(self.config.depth) * self.config.cell_size * 0.5;
        if local.x.abs() > half_width + TOLERANCE || local.z.abs() > half_depth + TOLERANCE {
            return None;
        }
        Some(hit)
    }

    /// Releases the generated mesh and deactivates the surface.
    pub fn teardown(&mut self) {
        self.mesh = None;
        self.active = false;
    }

    /// Whether the surface is initialized and following an observation
    /// point.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The surface configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Toggles snapping without touching the rest of the configuration.
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
    }

    /// Current anchor pose of the plane.
    #[must_use]
    pub fn anchor(&self) -> &Pose {
        &self.anchor
    }

    /// The generated mesh, if the surface has been initialized.
    #[must_use]
    pub fn mesh(&self) -> Option<&GridMesh> {
        self.mesh.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A surface lying flat at the origin with the observer straight down
    /// the +Z axis, so the local frame coincides with the world frame.
    fn flat_surface(cell_size: f64, width: u32, depth: u32) -> GridSurface {
        let config = GridConfig {
            cell_size,
            width,
            depth,
            vertical_offset: 0.0,
            smooth_follow: false,
            follow_mode: FollowMode::StaticFacing,
            ..GridConfig::default()
        };
        let mut surface = GridSurface::new(config).unwrap();
        let observation = Pose::new(p(0.0, 0.0, 10.0), UnitQuat::identity());
        surface
            .initialize(&Pose::identity(), Some(&observation))
            .unwrap();
        surface
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GridConfig {
            cell_size: 0.0,
            ..GridConfig::default()
        };
        assert!(GridSurface::new(config).is_err());
    }

    #[test]
    fn oversized_extents_are_rejected() {
        let config = GridConfig {
            width: MAX_GRID_EXTENT + 1,
            ..GridConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidParameters(_))
        ));
        let config = GridConfig {
            depth: MAX_GRID_EXTENT,
            ..GridConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn mesh_shape_matches_extents() {
        let surface = flat_surface(1.0, 4, 4);
        let mesh = surface.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);
    }

    #[test]
    fn missing_observation_point_degrades() {
        let mut surface = GridSurface::new(GridConfig::default()).unwrap();
        let result = surface.initialize(&Pose::identity(), None);
        assert!(matches!(result, Err(GridError::NoObservationPoint)));
        assert!(!surface.is_active());
        // Snapping degrades to the identity.
        let input = p(2.3, 5.0, 1.8);
        assert_relative_eq!(surface.nearest_grid_point(&input).x, 2.3);
    }

    #[test]
    fn nearest_point_rounds_in_plane_coordinates() {
        let surface = flat_surface(1.0, 4, 4);
        let snapped = surface.nearest_grid_point(&p(2.3, 5.0, 1.8));
        assert_relative_eq!(snapped.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(snapped.z, 2.0, epsilon = 1e-9);
        // Off-plane coordinate is pinned to the normal offset.
        assert_relative_eq!(snapped.y, 0.02, epsilon = 1e-9);
    }

    #[test]
    fn snapping_is_idempotent() {
        let surface = flat_surface(0.5, 8, 8);
        let once = surface.nearest_grid_point(&p(1.13, 3.0, -0.62));
        let twice = surface.nearest_grid_point(&once);
        assert_relative_eq!(once.x, twice.x, epsilon = 1e-9);
        assert_relative_eq!(once.y, twice.y, epsilon = 1e-9);
        assert_relative_eq!(once.z, twice.z, epsilon = 1e-9);
    }

    #[test]
    fn snapping_can_be_disabled() {
        let mut surface = flat_surface(1.0, 4, 4);
        surface.set_snap_enabled(false);
        let input = p(2.3, 5.0, 1.8);
        let result = surface.nearest_grid_point(&input);
        assert_relative_eq!(result.x, input.x);
        assert_relative_eq!(result.y, input.y);
    }

    #[test]
    fn raycast_hits_inside_extents_only() {
        let surface = flat_surface(1.0, 4, 4);
        let down = Ray::new(p(1.0, 5.0, 1.0), Vector3::new(0.0, -1.0, 0.0)).unwrap();
        let hit = surface.raycast(&down).unwrap();
        assert_relative_eq!(hit.y, 0.0, epsilon = 1e-9);

        let outside = Ray::new(p(30.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0)).unwrap();
        assert!(surface.raycast(&outside).is_none());
    }

    #[test]
    fn follow_camera_keeps_plane_ahead_of_observer() {
        let config = GridConfig {
            smooth_follow: false,
            vertical_offset: 0.0,
            ..GridConfig::default()
        };
        let mut surface = GridSurface::new(config).unwrap();
        let observation = Pose::identity(); // forward is +Z
        surface
            .initialize(&Pose::identity(), Some(&observation))
            .unwrap();
        assert_relative_eq!(surface.anchor().position.z, 10.0, epsilon = 1e-9);

        let moved = Pose::new(p(0.0, 0.0, 5.0), UnitQuat::identity());
        surface.update_follow(0.016, &moved);
        assert_relative_eq!(surface.anchor().position.z, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn smooth_follow_eases_toward_target() {
        let config = GridConfig {
            smooth_follow: true,
            follow_rate: 5.0,
            vertical_offset: 0.0,
            ..GridConfig::default()
        };
        let mut surface = GridSurface::new(config).unwrap();
        surface
            .initialize(&Pose::identity(), Some(&Pose::identity()))
            .unwrap();

        let moved = Pose::new(p(0.0, 0.0, 5.0), UnitQuat::identity());
        surface.update_follow(0.016, &moved);
        let z = surface.anchor().position.z;
        assert!(z > 10.0 && z < 15.0, "expected partial step, got {z}");
    }

    #[test]
    fn teardown_releases_mesh() {
        let mut surface = flat_surface(1.0, 4, 4);
        surface.teardown();
        assert!(surface.mesh().is_none());
        assert!(!surface.is_active());
    }
}
