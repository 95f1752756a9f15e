use nalgebra::Translation3;

use crate::error::GeometryError;

use super::{Isometry3, Point3, UnitQuat, Vector3, TOLERANCE};

/// A rigid pose: position plus orientation.
///
/// Orientation convention: local `+Z` is the forward axis, local `+Y` is up.
/// This is the frame used for cameras, build locations and grid anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position.
    pub position: Point3,
    /// World orientation.
    pub rotation: UnitQuat,
}

impl Pose {
    /// Creates a pose from a position and rotation.
    #[must_use]
    pub fn new(position: Point3, rotation: UnitQuat) -> Self {
        Self { position, rotation }
    }

    /// The identity pose at the world origin.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuat::identity(),
        }
    }

    /// Creates a pose at `eye` oriented so that `+Z` points at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `eye` and `target` coincide (no view direction).
    pub fn looking_at(eye: Point3, target: Point3, up: &Vector3) -> Result<Self, GeometryError> {
        let dir = target - eye;
        if dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        let rotation = UnitQuat::face_towards(&dir, up);
        Ok(Self {
            position: eye,
            rotation,
        })
    }

    /// The world-space forward axis (local `+Z`).
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.rotation * Vector3::z()
    }

    /// The world-space up axis (local `+Y`).
    #[must_use]
    pub fn up(&self) -> Vector3 {
        self.rotation * Vector3::y()
    }

    /// Converts the pose into a rigid transform mapping local to world space.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3 {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }

    /// Euclidean distance between the positions of two poses.
    #[must_use]
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.position - self.position).norm()
    }

    /// Angle in radians between the orientations of two poses.
    #[must_use]
    pub fn angle_to(&self, other: &Pose) -> f64 {
        self.rotation.angle_to(&other.rotation)
    }

    /// Advances this pose one easing step toward `target`.
    ///
    /// The step interpolates position (lerp) and rotation (slerp) by
    /// `rate * dt`, clamped to 1 so a large tick lands exactly on the
    /// target instead of overshooting. Plain state advanced synchronously
    /// each tick; there is no suspended animation behind this.
    pub fn step_toward(&mut self, target: &Pose, rate: f64, dt: f64) {
        let t = (rate * dt).clamp(0.0, 1.0);
        self.position = Point3::from(self.position.coords.lerp(&target.position.coords, t));
        // Antipodal orientations have no unique slerp path; land directly.
        self.rotation = self
            .rotation
            .try_slerp(&target.rotation, t, TOLERANCE)
            .unwrap_or(target.rotation);
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
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

    #[test]
    fn looking_at_points_forward_axis_at_target() {
        let pose = Pose::looking_at(p(0.0, 0.0, 0.0), p(0.0, 0.0, 5.0), &Vector3::y()).unwrap();
        let fwd = pose.forward();
        assert_relative_eq!(fwd.z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(fwd.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn looking_at_coincident_points_fails() {
        let result = Pose::looking_at(p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0), &Vector3::y());
        assert!(result.is_err());
    }

    #[test]
    fn step_toward_converges() {
        let mut pose = Pose::identity();
        let target = Pose::new(p(10.0, 0.0, 0.0), UnitQuat::identity());
        for _ in 0..200 {
            pose.step_toward(&target, 5.0, 0.016);
        }
        assert!(pose.distance_to(&target) < 0.01);
    }

    #[test]
    fn step_toward_clamps_large_ticks() {
        let mut pose = Pose::identity();
        let target = Pose::new(p(3.0, 0.0, 0.0), UnitQuat::identity());
        pose.step_toward(&target, 5.0, 10.0);
        assert_relative_eq!(pose.position.x, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn isometry_round_trip() {
        let pose = Pose::looking_at(p(1.0, 2.0, 3.0), p(4.0, 2.0, 3.0), &Vector3::y()).unwrap();
        let iso = pose.to_isometry();
        let local = iso.inverse_transform_point(&p(4.0, 2.0, 3.0));
        let back = iso.transform_point(&local);
        assert_relative_eq!(back.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 2.0, epsilon = 1e-9);
    }
}
