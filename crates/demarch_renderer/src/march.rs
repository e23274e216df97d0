//! Sphere marching: ray intersection against a distance estimator.

use crate::config::MarchConfig;
use crate::estimator::DistanceEstimator;
use demarch_math::{Ray, Vec3};

/// Where a march stopped on the surface, in the frame of the marched ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchHit {
    /// Ray parameter of the hit.
    pub t: f32,
    /// Hit position.
    pub p: Vec3,
    /// Number of steps taken before the hit.
    pub steps: u32,
}

/// March along `ray` until the estimate drops below the hit tolerance.
///
/// The direction is used as given: each step moves the position by
/// `distance * direction` and the parameter by `distance / |direction|`.
/// A direction longer than unit can therefore step through the surface, and a
/// shorter one inflates `t` relative to the hit point.
/// Marching starts at `t = ray.time / |direction|`; `time` doubles as a start
/// offset here, so callers pass 0 unless they mean to skip ahead.
///
/// Returns `None` when the estimate goes negative, `t` passes `ray.t_max`, the
/// iteration budget runs out, or the direction has zero length.
pub fn sphere_march<D: DistanceEstimator + ?Sized>(
    estimator: &D,
    ray: &Ray,
    config: &MarchConfig,
) -> Option<MarchHit> {
    let speed = ray.direction.length();
    if !(speed > 0.0) {
        return None;
    }

    let mut p = ray.origin;
    let mut t = ray.time / speed;

    for steps in 0..config.max_iterations() {
        let dist = estimator.distance(p);

        // Left the estimator's valid domain.
        if dist < 0.0 {
            return None;
        }
        if dist < config.hit_epsilon() {
            return Some(MarchHit { t, p, steps });
        }

        p += dist * ray.direction;
        t += dist / speed;
        if t > ray.t_max {
            return None;
        }
    }

    None
}
