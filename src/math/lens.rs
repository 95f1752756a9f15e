use crate::error::GeometryError;

use super::{Point2, Pose, Ray, Vector3};

/// Pinhole projection parameters for a camera: vertical field of view plus
/// viewport extents in pixels.
///
/// Used to resolve screen-space pointer positions into world-space view
/// rays, which placement logic then casts onto the grid surface.
#[derive(Debug, Clone, Copy)]
pub struct CameraLens {
    fov_y: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl CameraLens {
    /// Creates a new lens.
    ///
    /// # Errors
    ///
    /// Returns an error if the field of view is not in `(0, pi)` or either
    /// viewport extent is not positive.
    pub fn new(fov_y: f64, viewport_width: f64, viewport_height: f64) -> Result<Self, GeometryError> {
        if fov_y <= 0.0 || fov_y >= std::f64::consts::PI {
            return Err(GeometryError::Degenerate(
                "field of view must be in (0, pi)".to_owned(),
            ));
        }
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Err(GeometryError::Degenerate(
                "viewport extents must be positive".to_owned(),
            ));
        }
        Ok(Self {
            fov_y,
            viewport_width,
            viewport_height,
        })
    }

    /// Returns the vertical field of view in radians.
    #[must_use]
    pub fn fov_y(&self) -> f64 {
        self.fov_y
    }

    /// Returns the viewport aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.viewport_width / self.viewport_height
    }

    /// Unprojects a screen position (pixels, origin top-left, y down) into
    /// a world-space ray through the camera at `pose`.
    ///
    /// # Errors
    ///
    /// Returns an error if the derived view direction degenerates, which
    /// only happens for non-finite screen coordinates.
    pub fn screen_ray(&self, pose: &Pose, screen: &Point2) -> Result<Ray, GeometryError> {
        let ndc_x = 2.0 * screen.x / self.viewport_width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport_height;

        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect();

        // Local +Z is the forward axis; see `Pose`.
        let local = Vector3::new(ndc_x * half_width, ndc_y * half_height, 1.0);
        Ray::new(pose.position, pose.rotation * local)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    use crate::math::Point3;

    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(CameraLens::new(0.0, 800.0, 600.0).is_err());
        assert!(CameraLens::new(1.0, 0.0, 600.0).is_err());
    }

    #[test]
    fn center_of_screen_maps_to_forward() {
        let lens = CameraLens::new(FRAC_PI_2, 800.0, 600.0).unwrap();
        let pose = Pose::identity();
        let ray = lens
            .screen_ray(&pose, &Point2::new(400.0, 300.0))
            .unwrap();
        assert_relative_eq!(ray.direction().z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(ray.direction().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(ray.direction().y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn top_of_screen_tilts_up() {
        let lens = CameraLens::new(FRAC_PI_2, 800.0, 600.0).unwrap();
        let pose = Pose::identity();
        let ray = lens.screen_ray(&pose, &Point2::new(400.0, 0.0)).unwrap();
        assert!(ray.direction().y > 0.0);
    }

    #[test]
    fn ray_starts_at_camera_position() {
        let lens = CameraLens::new(FRAC_PI_2, 800.0, 600.0).unwrap();
        let pose = Pose::new(
            Point3::new(1.0, 2.0, 3.0),
            crate::math::UnitQuat::identity(),
        );
        let ray = lens
            .screen_ray(&pose, &Point2::new(400.0, 300.0))
            .unwrap();
        assert_relative_eq!(ray.origin().x, 1.0);
        assert_relative_eq!(ray.origin().y, 2.0);
        assert_relative_eq!(ray.origin().z, 3.0);
    }
}
