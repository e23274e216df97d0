// Re-export glam for convenience
pub use glam::*;

// Demarch math types
mod aabb;
mod bounds2;
mod interval;
mod ray;
pub mod sampling;
mod transform;

pub use aabb::Aabb;
pub use bounds2::Bounds2;
pub use interval::Interval;
pub use ray::{offset_ray_origin, Ray, RayDifferential};
pub use transform::{gamma, Transform};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    (1.0 - t) * a + t * b
}
