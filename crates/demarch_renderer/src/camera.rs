//! Camera contract: film samples in, world-space rays out.

use demarch_math::{Ray, RayDifferential, UVec2, Vec2};

/// Where on the film, the lens and the shutter interval a ray is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraSample {
    /// Raster position in pixels over the full film.
    pub p_film: Vec2,
    /// Lens sample in `[0, 1)^2`.
    pub p_lens: Vec2,
    /// Shutter sample in `[0, 1)`.
    pub time: f32,
}

pub trait Camera: Send + Sync {
    /// Full film resolution in pixels.
    fn film_resolution(&self) -> UVec2;

    /// A world-space ray for `sample` and its radiance weight.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, f32);

    /// Like [`Camera::generate_ray`], with one-pixel offset rays when the camera
    /// computes them. The default flags them absent.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (RayDifferential, f32) {
        let (ray, weight) = self.generate_ray(sample);
        (RayDifferential::without_differentials(ray), weight)
    }
}
