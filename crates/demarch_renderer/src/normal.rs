//! Finite-difference surface normals for distance estimators.

use crate::estimator::DistanceEstimator;
use demarch_math::Vec3;

/// Vertices of a tetrahedron inscribed in the cube `[-1, 1]^3`.
const TETRAHEDRON: [Vec3; 4] = [
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Unit normal of `estimator` at `p`, from its gradient sampled at four
/// tetrahedral offsets of size `eps`.
///
/// Returns `fallback` unchanged when the sampled gradient vanishes, e.g. in a
/// flat region of the field.
pub fn estimate_normal<D: DistanceEstimator + ?Sized>(
    estimator: &D,
    p: Vec3,
    eps: f32,
    fallback: Vec3,
) -> Vec3 {
    let gradient = TETRAHEDRON
        .iter()
        .fold(Vec3::ZERO, |acc, &v| acc + v * estimator.distance(p + v * eps));

    let length = gradient.length();
    if length > 0.0 {
        gradient / length
    } else {
        fallback
    }
}
