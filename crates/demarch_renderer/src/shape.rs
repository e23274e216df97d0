//! The shape contract consumed by the renderer.

use crate::interaction::SurfaceInteraction;
use demarch_math::{Aabb, Ray};

/// Geometry that rays can be intersected against.
///
/// Light sampling is deliberately not part of this trait; shapes that can be
/// sampled as area lights would expose that separately.
pub trait Shape: Send + Sync {
    fn object_bound(&self) -> Aabb;

    fn world_bound(&self) -> Aabb;

    fn area(&self) -> f32;

    /// The nearest hit along `ray` within `[0, ray.t_max]`, in world space.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction>;

    /// Whether `ray` hits at all. Cheaper than [`Shape::intersect`] when the
    /// shape can skip building the interaction.
    fn intersect_p(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}
