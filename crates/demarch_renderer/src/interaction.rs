//! Surface interaction record handed back to the caller on a hit.

use demarch_math::{Transform, Vec2, Vec3};

/// Geometry at a ray/surface hit.
///
/// Implicit surfaces have no natural parameterization: `uv` is always zero and
/// the tangents are an arbitrary orthonormal frame around `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInteraction {
    pub p: Vec3,
    /// Conservative per-axis absolute error of `p`, used to offset spawned rays.
    pub p_error: Vec3,
    pub uv: Vec2,
    /// Unit direction back towards the ray origin.
    pub wo: Vec3,
    /// Unit geometric normal.
    pub n: Vec3,
    pub dpdu: Vec3,
    pub dpdv: Vec3,
    pub dndu: Vec3,
    pub dndv: Vec3,
    /// Ray parameter of the hit.
    pub t: f32,
}

impl SurfaceInteraction {
    pub fn flip_normal(&mut self) {
        self.n = -self.n;
    }

    /// The same interaction expressed through `transform`, widening `p_error`
    /// by the rounding the transform introduces.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let (p, p_error) = transform.apply_point_with_error(self.p, self.p_error);
        Self {
            p,
            p_error,
            uv: self.uv,
            wo: transform.apply_vector(self.wo).normalize_or_zero(),
            n: transform.apply_normal(self.n).normalize_or_zero(),
            dpdu: transform.apply_vector(self.dpdu),
            dpdv: transform.apply_vector(self.dpdv),
            dndu: transform.apply_normal(self.dndu),
            dndv: transform.apply_normal(self.dndv),
            t: self.t,
        }
    }
}
