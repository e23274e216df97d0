//! Mandelbulb fractal distance estimator.

use crate::config::{require_positive, ConfigError};
use crate::estimator::DistanceEstimator;
use demarch_math::{Aabb, Vec3};
use std::f32::consts::TAU;

/// Escape radius of the iteration.
const BAILOUT: f32 = 2.0;

/// Half-extent of the box reported to the host.
const BOUND_HALF_EXTENT: f32 = TAU;

/// The power-`power` Mandelbulb, estimated with the usual running-derivative formula.
///
/// Each evaluation iterates up to `fractal_iterations` times, so a march that
/// takes `n` steps costs `n * fractal_iterations` inner iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mandelbulb {
    power: f32,
    fractal_iterations: u32,
}

impl Mandelbulb {
    pub fn new(power: f32, fractal_iterations: u32) -> Result<Self, ConfigError> {
        if fractal_iterations == 0 {
            return Err(ConfigError::ZeroCount {
                name: "maxiters",
                value: 0,
            });
        }
        Ok(Self {
            power: require_positive("mandelbulbPower", power)?,
            fractal_iterations,
        })
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn fractal_iterations(&self) -> u32 {
        self.fractal_iterations
    }
}

impl DistanceEstimator for Mandelbulb {
    fn distance(&self, p: Vec3) -> f32 {
        let power = self.power;
        let mut z = p;
        let mut dr = 1.0;
        let mut r = 0.0;

        for _ in 0..self.fractal_iterations {
            r = z.length();
            if r > BAILOUT {
                break;
            }

            // to spherical
            let theta = (z.z / r).acos() * power;
            let phi = z.y.atan2(z.x) * power;
            dr = r.powf(power - 1.0) * power * dr + 1.0;

            let zr = r.powf(power);
            z = zr * Vec3::new(theta.sin() * phi.cos(), phi.sin() * theta.sin(), theta.cos());
            z += p;
        }

        0.5 * r.ln() * r / dr
    }

    fn object_bound(&self) -> Aabb {
        Aabb::cube(BOUND_HALF_EXTENT)
    }

    fn area(&self) -> f32 {
        f32::INFINITY
    }
}
