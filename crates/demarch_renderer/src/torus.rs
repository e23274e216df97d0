//! Torus with an optional twist about its axis.

use crate::config::{require_finite, require_positive, ConfigError};
use crate::estimator::DistanceEstimator;
use demarch_math::{Aabb, Vec2, Vec3};
use std::f32::consts::PI;

/// A torus around the object-space Y axis.
///
/// The ring of radius `center_radius` lies in the XZ plane and the tube has
/// radius `tube_radius`. Before evaluation the point is rotated about Y by
/// `twist_degrees` per unit of height.
///
/// That rotation preserves both the XZ length and the height, so with the ring
/// in the XZ plane the twist leaves the field unchanged and every twist yields
/// the exact torus. `twist_degrees` is still read, validated and reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    tube_radius: f32,
    center_radius: f32,
    twist_degrees: f32,
}

impl Torus {
    pub fn new(tube_radius: f32, center_radius: f32, twist_degrees: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            tube_radius: require_positive("tubeRadius", tube_radius)?,
            center_radius: require_positive("centerRadius", center_radius)?,
            twist_degrees: require_finite("degree", twist_degrees)?,
        })
    }

    pub fn tube_radius(&self) -> f32 {
        self.tube_radius
    }

    pub fn center_radius(&self) -> f32 {
        self.center_radius
    }

    pub fn twist_degrees(&self) -> f32 {
        self.twist_degrees
    }
}

impl DistanceEstimator for Torus {
    fn distance(&self, p: Vec3) -> f32 {
        let (s, c) = (self.twist_degrees * p.y).to_radians().sin_cos();
        let q = Vec3::new(c * p.x - s * p.z, p.y, s * p.x + c * p.z);

        let ring = Vec2::new(q.x, q.z).length() - self.center_radius;
        Vec2::new(ring, q.y).length() - self.tube_radius
    }

    fn object_bound(&self) -> Aabb {
        Aabb::cube(self.center_radius + 2.0 * self.tube_radius)
    }

    fn area(&self) -> f32 {
        4.0 * PI * PI * self.center_radius * self.tube_radius
    }
}
