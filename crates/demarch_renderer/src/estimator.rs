//! The distance-estimator capability shared by every implicit surface.

use demarch_math::{Aabb, Vec3};

/// A scalar field whose zero set is the surface.
///
/// `distance(p)` must never exceed the true distance from `p` to the surface
/// while `p` is outside it, so that stepping along a ray by that amount cannot
/// skip the surface. Negative values mean `p` left the estimator's valid domain.
/// Implementations are immutable and evaluated concurrently from many threads.
pub trait DistanceEstimator: Send + Sync {
    fn distance(&self, p: Vec3) -> f32;

    /// Conservative object-space bounds, used only for acceleration.
    fn object_bound(&self) -> Aabb;

    /// Approximate surface area; infinite for unbounded or fractal surfaces.
    fn area(&self) -> f32;

    /// Radius of the object-space sphere used for solid-angle estimates.
    fn bounding_radius(&self) -> f32 {
        1.0
    }
}

/// Wraps a closure as an unbounded distance estimator.
pub struct FnEstimator<F: Fn(Vec3) -> f32 + Send + Sync>(pub F);

impl<F: Fn(Vec3) -> f32 + Send + Sync> DistanceEstimator for FnEstimator<F> {
    fn distance(&self, p: Vec3) -> f32 {
        (self.0)(p)
    }

    fn object_bound(&self) -> Aabb {
        Aabb::UNIVERSE
    }

    fn area(&self) -> f32 {
        f32::INFINITY
    }
}
