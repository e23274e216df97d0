//! Infinite lattice of unit spheres.

use crate::config::{require_positive, ConfigError};
use crate::estimator::DistanceEstimator;
use demarch_math::{Aabb, Vec3};

/// Half-extent of the box reported to the host; the field itself never ends.
const BOUND_HALF_EXTENT: f32 = 10000.0;

/// IEEE remainder: `x - n * y` with `n` the integer nearest `x / y` (ties to even).
///
/// The result lies in `[-y/2, y/2]`, which folds every point into the cell
/// centered on the nearest lattice point.
fn remainder(x: f32, y: f32) -> f32 {
    x - (x / y).round_ties_even() * y
}

/// Unit spheres centered on every point of a cubic lattice with spacing `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicGrid {
    cell_size: f32,
}

impl PeriodicGrid {
    pub fn new(cell_size: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            cell_size: require_positive("cellSize", cell_size)?,
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

impl DistanceEstimator for PeriodicGrid {
    fn distance(&self, p: Vec3) -> f32 {
        let local = Vec3::new(
            remainder(p.x, self.cell_size),
            remainder(p.y, self.cell_size),
            remainder(p.z, self.cell_size),
        );
        local.length() - 1.0
    }

    fn object_bound(&self) -> Aabb {
        Aabb::cube(BOUND_HALF_EXTENT)
    }

    fn area(&self) -> f32 {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_matches_ieee() {
        assert_eq!(remainder(5.0, 3.0), -1.0);
        assert_eq!(remainder(4.0, 3.0), 1.0);
        assert_eq!(remainder(-5.0, 3.0), 1.0);
        // Ties go to the even quotient.
        assert_eq!(remainder(1.5, 1.0), -0.5);
        assert_eq!(remainder(2.5, 1.0), 0.5);
    }

    #[test]
    fn test_grid_is_periodic() {
        let grid = PeriodicGrid::new(3.0).unwrap();
        let points = [
            Vec3::new(0.3, 0.2, 0.1),
            Vec3::new(-1.2, 0.7, 2.9),
            Vec3::new(10.25, -4.5, 0.0),
        ];

        for p in points {
            let d = grid.distance(p);
            for shift in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X] {
                let shifted = grid.distance(p + shift * grid.cell_size());
                assert!((d - shifted).abs() < 1e-4, "{p} shifted by {shift}");
            }
        }
    }

    #[test]
    fn test_grid_sphere_centers_and_surfaces() {
        let grid = PeriodicGrid::new(4.0).unwrap();

        assert_eq!(grid.distance(Vec3::ZERO), -1.0);
        assert_eq!(grid.distance(Vec3::new(8.0, -4.0, 12.0)), -1.0);
        assert!(grid.distance(Vec3::new(1.0, 0.0, 0.0)).abs() < 1e-6);
        assert!(grid.distance(Vec3::new(4.0, 4.0, 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_grid_is_unbounded() {
        let grid = PeriodicGrid::new(2.0).unwrap();

        assert_eq!(grid.area(), f32::INFINITY);
        assert_eq!(grid.object_bound(), Aabb::cube(10000.0));
        assert!(PeriodicGrid::new(0.0).is_err());
    }
}
