use crate::error::GeometryError;
use crate::math::{Pose, Vector3};

use super::camera::CameraRig;

/// A designated world location where a build session may start.
///
/// Carries either a dedicated observation camera or the offsets from
/// which the session computes an overview pose for the primary camera to
/// ease toward.
#[derive(Debug, Clone)]
pub struct BuildLocation {
    /// Display name, echoed in session events.
    pub name: String,
    /// World transform of the location.
    pub pose: Pose,
    /// Optional dedicated observation camera.
    pub camera: Option<CameraRig>,
    /// Where the overview camera sits, relative to the location (world
    /// axes).
    pub camera_position_offset: Vector3,
    /// What the overview camera looks at, relative to the location.
    pub camera_look_at_offset: Vector3,
    /// Whether entering a session here freezes player movement.
    pub disable_player_movement: bool,
}

impl BuildLocation {
    /// Creates a location with the default overview offsets: camera above
    /// and behind, looking slightly above the pivot.
    #[must_use]
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose,
            camera: None,
            camera_position_offset: Vector3::new(0.0, 8.0, -12.0),
            camera_look_at_offset: Vector3::new(0.0, 2.0, 0.0),
            disable_player_movement: true,
        }
    }

    /// Attaches a dedicated observation camera. It starts disabled; the
    /// session enables it on entry.
    #[must_use]
    pub fn with_camera(mut self, mut camera: CameraRig) -> Self {
        camera.enabled = false;
        self.camera = Some(camera);
        self
    }

    /// Computes the overview pose the primary camera eases toward when no
    /// dedicated camera exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured offsets place the camera on its
    /// own look-at target.
    pub fn overview_pose(&self) -> Result<Pose, GeometryError> {
        let eye = self.pose.position + self.camera_position_offset;
        let target = self.pose.position + self.camera_look_at_offset;
        Pose::looking_at(eye, target, &Vector3::y())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use crate::math::Point3;

    use super::*;

    #[test]
    fn overview_pose_uses_world_axis_offsets() {
        let location = BuildLocation::new(
            "bridge gap",
            Pose::new(Point3::new(10.0, 0.0, 5.0), crate::math::UnitQuat::identity()),
        );
        let pose = location.overview_pose().unwrap();
        assert_relative_eq!(pose.position.x, 10.0);
        assert_relative_eq!(pose.position.y, 8.0);
        assert_relative_eq!(pose.position.z, -7.0);
        // Forward axis points back toward the location.
        assert!(pose.forward().z > 0.0);
    }

    #[test]
    fn degenerate_offsets_fail() {
        let mut location = BuildLocation::new("broken", Pose::identity());
        location.camera_position_offset = Vector3::new(0.0, 2.0, 0.0);
        location.camera_look_at_offset = Vector3::new(0.0, 2.0, 0.0);
        assert!(location.overview_pose().is_err());
    }
}
