//! Sphere distance estimator.

use crate::config::{require_positive, ConfigError};
use crate::estimator::DistanceEstimator;
use demarch_math::{Aabb, Vec3};
use std::f32::consts::PI;

/// A sphere of `radius` centered on the object-space origin. Exact SDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl DistanceEstimator for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }

    fn object_bound(&self) -> Aabb {
        Aabb::cube(self.radius)
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn bounding_radius(&self) -> f32 {
        self.radius
    }
}
