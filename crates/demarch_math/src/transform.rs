// Object <-> world transforms with floating-point error bounds.
//
// Points and rays carried between coordinate frames pick up rounding error;
// the `*_with_error` variants return a conservative per-axis bound on it so
// callers can offset spawned rays far enough to escape the surface.

use std::ops::Mul;

use glam::{Mat3, Mat4, Vec3};

use crate::{Aabb, Ray};

/// Bound on the relative rounding error of `n` chained floating-point operations.
#[inline]
pub fn gamma(n: u32) -> f32 {
    let eps = f32::EPSILON * 0.5;
    let n = n as f32;
    (n * eps) / (1.0 - n * eps)
}

/// A 4x4 transform stored together with its inverse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m: Mat4,
    m_inv: Mat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m: Mat4::IDENTITY,
        m_inv: Mat4::IDENTITY,
    };

    /// Wrap a matrix; the inverse is computed once here.
    pub fn new(m: Mat4) -> Self {
        Self {
            m,
            m_inv: m.inverse(),
        }
    }

    pub fn from_translation(offset: Vec3) -> Self {
        Self::new(Mat4::from_translation(offset))
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self::new(Mat4::from_scale(scale))
    }

    /// Perspective projection looking down +Z, mapping `near..far` to `0..1` in z.
    ///
    /// `fov_degrees` is the full angle spanned by the shorter screen axis.
    pub fn perspective(fov_degrees: f32, near: f32, far: f32) -> Self {
        let persp = Mat4::from_cols(
            glam::Vec4::new(1.0, 0.0, 0.0, 0.0),
            glam::Vec4::new(0.0, 1.0, 0.0, 0.0),
            glam::Vec4::new(0.0, 0.0, far / (far - near), 1.0),
            glam::Vec4::new(0.0, 0.0, -far * near / (far - near), 0.0),
        );
        let inv_tan = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
        Self::new(Mat4::from_scale(Vec3::new(inv_tan, inv_tan, 1.0)) * persp)
    }

    pub fn inverse(&self) -> Transform {
        Transform {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// True when the transform flips a right-handed frame into a left-handed one.
    pub fn swaps_handedness(&self) -> bool {
        Mat3::from_mat4(self.m).determinant() < 0.0
    }

    /// Transform a point, dividing through by w for projective matrices.
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        self.m.project_point3(p)
    }

    /// Transform a vector (no translation).
    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        self.m.transform_vector3(v)
    }

    /// Transform a surface normal with the inverse transpose.
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        self.m_inv.transpose().transform_vector3(n)
    }

    /// Transform an affine point that already carries `p_error`, returning the
    /// new point and a bound on its accumulated absolute error.
    pub fn apply_point_with_error(&self, p: Vec3, p_error: Vec3) -> (Vec3, Vec3) {
        let abs_m = self.abs_matrix();
        let g3 = gamma(3);
        let error = (g3 + 1.0) * abs_m.transform_vector3(p_error)
            + g3 * abs_m.transform_point3(p.abs());
        (self.m.transform_point3(p), error)
    }

    /// Transform a vector, returning it with a bound on the rounding error introduced.
    pub fn apply_vector_with_error(&self, v: Vec3) -> (Vec3, Vec3) {
        let error = gamma(3) * self.abs_matrix().transform_vector3(v.abs());
        (self.m.transform_vector3(v), error)
    }

    /// Transform a ray. The origin is nudged along the direction past its own
    /// rounding error and `t_max` shortened to match.
    ///
    /// Returns the ray together with the origin and direction error bounds.
    pub fn apply_ray_with_error(&self, ray: &Ray) -> (Ray, Vec3, Vec3) {
        let (mut origin, origin_error) = self.apply_point_with_error(ray.origin, Vec3::ZERO);
        let (direction, direction_error) = self.apply_vector_with_error(ray.direction);

        let mut t_max = ray.t_max;
        let length_squared = direction.length_squared();
        if length_squared > 0.0 {
            let dt = direction.abs().dot(origin_error) / length_squared;
            origin += direction * dt;
            t_max -= dt;
        }

        let transformed = Ray {
            origin,
            direction,
            t_max,
            time: ray.time,
        };
        (transformed, origin_error, direction_error)
    }

    pub fn apply_ray(&self, ray: &Ray) -> Ray {
        self.apply_ray_with_error(ray).0
    }

    /// Bounding box of all eight transformed corners.
    pub fn apply_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.min().is_finite() && aabb.max().is_finite() {
            let corners = aabb.corners().map(|corner| self.m.transform_point3(corner));
            let (lo, hi) = corners[1..]
                .iter()
                .fold((corners[0], corners[0]), |(lo, hi), &c| (lo.min(c), hi.max(c)));
            Aabb::from_points(lo, hi)
        } else {
            *aabb
        }
    }

    fn abs_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.m.x_axis.abs(),
            self.m.y_axis.abs(),
            self.m.z_axis.abs(),
            self.m.w_axis.abs(),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: self.m * rhs.m,
            m_inv: rhs.m_inv * self.m_inv,
        }
    }
}
