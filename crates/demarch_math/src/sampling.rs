//! Small sampling and frame-construction helpers.

use crate::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Map a point of the unit square onto the unit disk (Shirley–Chiu concentric mapping).
///
/// Preserves relative areas, so uniformly distributed input yields uniformly
/// distributed points on the disk.
pub fn concentric_sample_disk(u: Vec2) -> Vec2 {
    let offset = 2.0 * u - Vec2::ONE;
    if offset.x == 0.0 && offset.y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, FRAC_PI_4 * (offset.y / offset.x))
    } else {
        (offset.y, FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y))
    };
    r * Vec2::new(theta.cos(), theta.sin())
}

/// Build two unit vectors completing `v` (assumed unit length) to an orthonormal frame.
///
/// The returned pair `(a, b)` satisfies `b == v.cross(a)`, hence `a.cross(b) == v`.
pub fn coordinate_system(v: Vec3) -> (Vec3, Vec3) {
    let a = if v.x.abs() > v.y.abs() {
        Vec3::new(-v.z, 0.0, v.x) / (v.x * v.x + v.z * v.z).sqrt()
    } else {
        Vec3::new(0.0, v.z, -v.y) / (v.y * v.y + v.z * v.z).sqrt()
    };
    (a, v.cross(a))
}

/// Density of uniformly sampled directions inside a cone with half-angle cosine `cos_theta_max`.
#[inline]
pub fn uniform_cone_pdf(cos_theta_max: f32) -> f32 {
    1.0 / (2.0 * PI * (1.0 - cos_theta_max))
}
