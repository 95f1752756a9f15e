use crate::error::GeometryError;

use super::{Point3, Vector3, TOLERANCE};

/// A half-line defined by an origin and a unit direction.
///
/// Parametric form: `P(t) = origin + t * direction`, `t >= 0`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    /// Creates a new ray from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self, GeometryError> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Returns the origin point of the ray.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the ray.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Evaluates the ray at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Intersects the ray with the plane through `plane_origin` with the
    /// given normal.
    ///
    /// Returns `None` when the ray is parallel to the plane or the
    /// intersection lies behind the ray origin.
    #[must_use]
    pub fn intersect_plane(&self, plane_origin: &Point3, plane_normal: &Vector3) -> Option<Point3> {
        let denom = plane_normal.dot(&self.direction);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = plane_normal.dot(&(plane_origin - self.origin)) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
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

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[test]
    fn zero_direction_fails() {
        assert!(Ray::new(p(0.0, 0.0, 0.0), v(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn hits_plane_in_front() {
        let ray = Ray::new(p(0.0, 5.0, 0.0), v(0.0, -1.0, 0.0)).unwrap();
        let hit = ray
            .intersect_plane(&p(0.0, 0.0, 0.0), &v(0.0, 1.0, 0.0))
            .unwrap();
        assert_relative_eq!(hit.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn misses_plane_behind() {
        let ray = Ray::new(p(0.0, 5.0, 0.0), v(0.0, 1.0, 0.0)).unwrap();
        assert!(ray
            .intersect_plane(&p(0.0, 0.0, 0.0), &v(0.0, 1.0, 0.0))
            .is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(p(0.0, 5.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        assert!(ray
            .intersect_plane(&p(0.0, 0.0, 0.0), &v(0.0, 1.0, 0.0))
            .is_none());
    }
}
