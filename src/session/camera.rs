use crate::math::{CameraLens, Pose};

/// How close the eased camera must get to its target pose, in world units,
/// before the transition counts as settled.
const POSITION_THRESHOLD: f64 = 0.1;

/// Angular settling threshold in radians (one degree).
const ANGLE_THRESHOLD: f64 = std::f64::consts::PI / 180.0;

/// An externally owned camera: pose, projection parameters and an enabled
/// flag the session toggles when swapping views.
#[derive(Debug, Clone, Copy)]
pub struct CameraRig {
    /// Current world pose of the camera.
    pub pose: Pose,
    /// Projection parameters used for screen-to-world rays.
    pub lens: CameraLens,
    /// Whether this camera is currently rendering.
    pub enabled: bool,
}

impl CameraRig {
    /// Creates an enabled rig.
    #[must_use]
    pub fn new(pose: Pose, lens: CameraLens) -> Self {
        Self {
            pose,
            lens,
            enabled: true,
        }
    }
}

/// Easing of the primary camera toward an overview pose, advanced one
/// step per tick. Settling is observational only: building can proceed
/// before the camera finishes easing in.
#[derive(Debug, Clone)]
pub struct CameraTransition {
    target: Pose,
    rate: f64,
    settled: bool,
}

impl CameraTransition {
    /// Creates a transition toward `target` at the given easing rate.
    #[must_use]
    pub fn new(target: Pose, rate: f64) -> Self {
        Self {
            target,
            rate,
            settled: false,
        }
    }

    /// The pose the camera is easing toward.
    #[must_use]
    pub fn target(&self) -> &Pose {
        &self.target
    }

    /// Returns `true` once the camera has come within the position and
    /// angle thresholds of the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advances `pose` one easing step toward the target. Does nothing
    /// once settled.
    pub fn advance(&mut self, pose: &mut Pose, dt: f64) {
        if self.settled {
            return;
        }
        pose.step_toward(&self.target, self.rate, dt);
        if pose.distance_to(&self.target) < POSITION_THRESHOLD
            && pose.angle_to(&self.target) < ANGLE_THRESHOLD
        {
            self.settled = true;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::math::{Point3, UnitQuat, Vector3};

    use super::*;

    #[test]
    fn transition_settles_within_thresholds() {
        let target = Pose::new(Point3::new(0.0, 8.0, -12.0), UnitQuat::identity());
        let mut transition = CameraTransition::new(target, 5.0);
        let mut pose = Pose::identity();

        for _ in 0..600 {
            transition.advance(&mut pose, 0.016);
        }
        assert!(transition.is_settled());
        assert!(pose.distance_to(&target) < 0.1);
    }

    #[test]
    fn settled_transition_stops_moving_the_camera() {
        let target = Pose::new(Point3::new(1.0, 0.0, 0.0), UnitQuat::identity());
        let mut transition = CameraTransition::new(target, 100.0);
        let mut pose = Pose::identity();
        transition.advance(&mut pose, 1.0);
        assert!(transition.is_settled());

        let frozen = pose;
        transition.advance(&mut pose, 1.0);
        assert!((pose.position - frozen.position).norm() < f64::EPSILON);
    }

    #[test]
    fn rotation_must_also_settle() {
        let target = Pose::new(
            Point3::origin(),
            UnitQuat::from_axis_angle(&Vector3::y_axis(), 1.0),
        );
        let mut transition = CameraTransition::new(target, 0.5);
        let mut pose = Pose::identity();
        transition.advance(&mut pose, 0.016);
        // Position already matches but the rotation is still far off.
        assert!(!transition.is_settled());
    }
}
