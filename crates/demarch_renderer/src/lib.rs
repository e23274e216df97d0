//! Demarch Renderer - sphere-marched implicit surfaces and a lightfield camera.
//!
//! Shapes are [`DistanceEstimator`]s (sphere, periodic sphere grid, twisted
//! torus, Mandelbulb) wrapped in an [`ImplicitShape`] that places them in the
//! world and intersects rays by sphere marching. The [`LightfieldCamera`]
//! replicates one perspective camera over a grid of film tiles. Everything is
//! immutable after construction and safe to share across render threads.

mod camera;
mod config;
mod estimator;
mod factory;
mod implicit;
mod interaction;
mod lightfield;
mod mandelbulb;
mod march;
mod normal;
mod preview;
mod shape;
mod sphere;
mod sphere_grid;
mod torus;

pub use camera::{Camera, CameraSample};
pub use config::{ConfigError, MarchConfig};
pub use estimator::{DistanceEstimator, FnEstimator};
pub use factory::{
    create_lightfield_camera, create_mandelbulb_shape, create_shape, create_sphere_grid_shape,
    create_sphere_shape, create_torus_shape,
};
pub use implicit::ImplicitShape;
pub use interaction::SurfaceInteraction;
pub use lightfield::{LightfieldCamera, LightfieldParams};
pub use mandelbulb::Mandelbulb;
pub use march::{sphere_march, MarchHit};
pub use normal::estimate_normal;
pub use preview::{
    generate_buckets, normal_color, render_bucket, render_preview, Bucket, Color, ImageBuffer,
    PreviewConfig, DEFAULT_BUCKET_SIZE,
};
pub use shape::Shape;
pub use sphere::Sphere;
pub use sphere_grid::PeriodicGrid;
pub use torus::Torus;

/// Re-export the math types that appear in this crate's API.
pub use demarch_math::{Aabb, Ray, RayDifferential, Transform, UVec2, Vec2, Vec3};
