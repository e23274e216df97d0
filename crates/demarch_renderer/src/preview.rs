//! Bucketed preview rendering.
//!
//! Splits the film into buckets rendered in parallel with rayon, center
//! first, and shades every hit by its world-space normal. Used to eyeball
//! shapes and cameras, not for light transport.

use crate::camera::{Camera, CameraSample};
use crate::shape::Shape;
use demarch_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

pub type Color = Vec3;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Top-left corner in pixels.
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order.
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Cover a `width x height` image with buckets, ordered from the center outward.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(bucket_size as usize) {
        for x in (0..width).step_by(bucket_size as usize) {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
        }
    }

    let center = Vec2::new(width as f32, height as f32) / 2.0;
    buckets.sort_by(|a, b| {
        let da = a.center().distance_squared(center);
        let db = b.center().distance_squared(center);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Preview render settings.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub samples_per_pixel: u32,
    pub bucket_size: u32,
    /// Color of pixels whose rays miss.
    pub background: Color,
    /// Rays are clipped to this distance.
    pub max_distance: f32,
    pub seed: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            bucket_size: DEFAULT_BUCKET_SIZE,
            background: Color::ZERO,
            max_distance: 100.0,
            seed: 0,
        }
    }
}

/// Linear RGB pixels in row-major order.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn to_rgba8(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.get(x, y).clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            image::Rgba([c.x as u8, c.y as u8, c.z as u8, 255])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_rgba8().save_with_format(path, image::ImageFormat::Png)
    }
}

/// Map a unit normal to a displayable color.
pub fn normal_color(n: Vec3) -> Color {
    0.5 * (n + Vec3::ONE)
}

fn render_pixel(
    camera: &dyn Camera,
    shape: &dyn Shape,
    x: u32,
    y: u32,
    config: &PreviewConfig,
    rng: &mut StdRng,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut color = Color::ZERO;

    for _ in 0..samples {
        let sample = CameraSample {
            p_film: Vec2::new(x as f32 + rng.gen::<f32>(), y as f32 + rng.gen::<f32>()),
            p_lens: Vec2::new(rng.gen(), rng.gen()),
            time: 0.0,
        };
        let (ray, weight) = camera.generate_ray(&sample);
        let ray = ray.with_t_max(config.max_distance);

        color += match shape.intersect(&ray) {
            Some(si) => weight * normal_color(si.n),
            None => config.background,
        };
    }

    color / samples as f32
}

/// Pixels of one bucket in row-major order.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &dyn Camera,
    shape: &dyn Shape,
    config: &PreviewConfig,
) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(config.seed ^ bucket.index as u64);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(render_pixel(
                camera,
                shape,
                bucket.x + local_x,
                bucket.y + local_y,
                config,
                &mut rng,
            ));
        }
    }

    pixels
}

/// Render `shape` through `camera` over the camera's full film.
pub fn render_preview(camera: &dyn Camera, shape: &dyn Shape, config: &PreviewConfig) -> ImageBuffer {
    let resolution = camera.film_resolution();
    let buckets = generate_buckets(resolution.x, resolution.y, config.bucket_size);
    let start = Instant::now();

    let results: Vec<(Bucket, Vec<Color>)> = buckets
        .par_iter()
        .map(|bucket| (*bucket, render_bucket(bucket, camera, shape, config)))
        .collect();

    let mut image = ImageBuffer::new(resolution.x, resolution.y);
    for (bucket, pixels) in results {
        for (i, color) in pixels.into_iter().enumerate() {
            let i = i as u32;
            image.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, color);
        }
    }

    log::info!(
        "Rendered {}x{} preview ({} buckets, {} spp) in {:.2?}",
        resolution.x,
        resolution.y,
        buckets.len(),
        config.samples_per_pixel,
        start.elapsed()
    );

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImplicitShape, LightfieldCamera, LightfieldParams, MarchConfig, Sphere};
    use demarch_math::{Transform, UVec2};

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4);

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 70);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);

        assert_eq!((buckets[0].x, buckets[0].y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_normal_color() {
        assert_eq!(normal_color(Vec3::X), Vec3::new(1.0, 0.5, 0.5));
        assert_eq!(normal_color(-Vec3::Z), Vec3::new(0.5, 0.5, 0.0));
    }

    fn scene(resolution: UVec2, cpd: UVec2) -> (LightfieldCamera, ImplicitShape<Sphere>) {
        let mut settings = LightfieldParams::for_film(resolution);
        settings.cameras_per_dim = cpd;
        let camera = LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).unwrap();
        let shape = ImplicitShape::new(
            Sphere::new(1.0).unwrap(),
            MarchConfig::with_epsilon(1e-3).unwrap(),
            Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)),
            false,
        );
        (camera, shape)
    }

    #[test]
    fn test_render_preview_hits_center_misses_corner() {
        let (camera, shape) = scene(UVec2::splat(32), UVec2::ONE);
        let config = PreviewConfig {
            samples_per_pixel: 1,
            ..Default::default()
        };

        let image = render_preview(&camera, &shape, &config);
        assert_eq!((image.width, image.height), (32, 32));

        // Facing the camera: normal close to -Z.
        let center = image.get(16, 16);
        assert!((center - Vec3::new(0.5, 0.5, 0.0)).length() < 0.25);
        assert_eq!(image.get(0, 0), config.background);
    }

    #[test]
    fn test_render_preview_repeats_per_tile() {
        let (camera, shape) = scene(UVec2::splat(64), UVec2::new(2, 2));
        let config = PreviewConfig {
            samples_per_pixel: 1,
            ..Default::default()
        };

        let image = render_preview(&camera, &shape, &config);
        // Each 32x32 tile sees the sphere centered.
        for (x, y) in [(16, 16), (48, 16), (16, 48), (48, 48)] {
            assert!((image.get(x, y) - Vec3::new(0.5, 0.5, 0.0)).length() < 0.25);
        }
        assert_eq!(image.get(32, 32), config.background);
    }

    #[test]
    fn test_render_preview_is_deterministic() {
        let (camera, shape) = scene(UVec2::splat(32), UVec2::ONE);
        let config = PreviewConfig {
            samples_per_pixel: 2,
            bucket_size: 8,
            seed: 7,
            ..Default::default()
        };

        let a = render_preview(&camera, &shape, &config);
        let b = render_preview(&camera, &shape, &config);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_to_rgba8() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Vec3::new(1.0, 0.5, 2.0));

        let rgba = image.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [255, 127, 255, 255]);
    }
}
