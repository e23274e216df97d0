use crate::Vec3;

/// A ray in 3D space with origin, direction, extent and time.
///
/// The direction is stored exactly as given and never normalized: shapes that
/// march along the ray divide by its length to recover parametric distance.
/// The valid parametric range is `[0, t_max]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_max: f32,
    pub time: f32,
}

impl Ray {
    /// Create an unbounded ray at time 0.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            t_max: f32::INFINITY,
            time: 0.0,
        }
    }

    /// Replace the far end of the valid parametric range.
    pub fn with_t_max(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }

    /// Replace the time value carried by the ray.
    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Push `p` off its surface along `n` by the projected error bound, onto the
/// side that `w` leaves towards, so a ray spawned there cannot re-hit the surface.
pub fn offset_ray_origin(p: Vec3, p_error: Vec3, n: Vec3, w: Vec3) -> Vec3 {
    let d = n.abs().dot(p_error);
    let offset = if w.dot(n) < 0.0 { -d * n } else { d * n };
    p + offset
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

/// A ray plus optional offset rays for one-pixel steps in x and y on the film.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayDifferential {
    pub ray: Ray,
    pub rx_origin: Vec3,
    pub ry_origin: Vec3,
    pub rx_direction: Vec3,
    pub ry_direction: Vec3,
    /// False when the producer did not compute the offset rays; texture
    /// filtering must then take its non-differential path.
    pub has_differentials: bool,
}

impl RayDifferential {
    /// Wrap a ray with the differentials flagged absent.
    pub fn without_differentials(ray: Ray) -> Self {
        Self {
            ray,
            rx_origin: ray.origin,
            ry_origin: ray.origin,
            rx_direction: ray.direction,
            ry_direction: ray.direction,
            has_differentials: false,
        }
    }
}
