use super::Point3;

/// Rounds `value` to the nearest multiple of `step`.
///
/// `step` must be positive; callers validate their cell sizes up front.
#[must_use]
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Rounds all three coordinates of a point to the nearest lattice multiple
/// of `step`. Used for designer-placed persistent points, which always sit
/// on whole lattice positions.
#[must_use]
pub fn round_to_lattice(point: &Point3, step: f64) -> Point3 {
    Point3::new(
        round_to_step(point.x, step),
        round_to_step(point.y, step),
        round_to_step(point.z, step),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rounds_to_nearest_multiple() {
        assert_relative_eq!(round_to_step(2.3, 1.0), 2.0);
        assert_relative_eq!(round_to_step(2.5, 1.0), 3.0);
        assert_relative_eq!(round_to_step(-0.7, 0.5), -0.5);
    }

    #[test]
    fn rounding_is_idempotent() {
        let once = round_to_step(17.31, 0.25);
        assert_relative_eq!(round_to_step(once, 0.25), once);
    }

    #[test]
    fn lattice_rounds_all_axes() {
        let snapped = round_to_lattice(&Point3::new(0.6, 1.4, -2.5), 1.0);
        assert_relative_eq!(snapped.x, 1.0);
        assert_relative_eq!(snapped.y, 1.0);
        assert_relative_eq!(snapped.z, -2.0);
    }
}
