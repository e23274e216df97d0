//! Construction of shapes and cameras from scene-description parameters.
//!
//! Each shape has its own default tolerances; invalid parameter values are
//! logged and replaced by those defaults rather than rejected.

use crate::camera::Camera;
use crate::config::{positive_param, ConfigError, MarchConfig};
use crate::implicit::ImplicitShape;
use crate::lightfield::{LightfieldCamera, LightfieldParams};
use crate::mandelbulb::Mandelbulb;
use crate::shape::Shape;
use crate::sphere::Sphere;
use crate::sphere_grid::PeriodicGrid;
use crate::torus::Torus;
use demarch_core::ParamSet;
use demarch_math::{Transform, UVec2};

const SPHERE_EPSILON: f32 = 1e-2;
const GRID_EPSILON: f32 = 1e-2;
const TORUS_EPSILON: f32 = 1e-5;
const MANDELBULB_EPSILON: f32 = 1e-4;

pub fn create_sphere_shape(
    object_to_world: Transform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<ImplicitShape<Sphere>, ConfigError> {
    let sphere = Sphere::new(positive_param(params, "radius", 1.0))?;
    let config = MarchConfig::from_params(params, SPHERE_EPSILON);
    Ok(ImplicitShape::new(sphere, config, object_to_world, reverse_orientation))
}

pub fn create_sphere_grid_shape(
    object_to_world: Transform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<ImplicitShape<PeriodicGrid>, ConfigError> {
    let grid = PeriodicGrid::new(positive_param(params, "cellSize", 1.0))?;
    let config = MarchConfig::from_params(params, GRID_EPSILON);
    Ok(ImplicitShape::new(grid, config, object_to_world, reverse_orientation))
}

pub fn create_torus_shape(
    object_to_world: Transform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<ImplicitShape<Torus>, ConfigError> {
    let torus = Torus::new(
        positive_param(params, "tubeRadius", 1.0),
        positive_param(params, "centerRadius", 2.0),
        params.find_one_float("degree", 0.0),
    )?;
    let config = MarchConfig::from_params(params, TORUS_EPSILON);
    Ok(ImplicitShape::new(torus, config, object_to_world, reverse_orientation))
}

/// The fractal iteration count follows `maxiters`, the same budget as the march.
pub fn create_mandelbulb_shape(
    object_to_world: Transform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<ImplicitShape<Mandelbulb>, ConfigError> {
    let config = MarchConfig::from_params(params, MANDELBULB_EPSILON);
    let bulb = Mandelbulb::new(
        positive_param(params, "mandelbulbPower", 8.0),
        config.max_iterations(),
    )?;
    Ok(ImplicitShape::new(bulb, config, object_to_world, reverse_orientation))
}

/// Build the shape registered under `name`, or `None` (logged) when the name
/// is unknown or the parameters cannot produce a valid shape.
pub fn create_shape(
    name: &str,
    object_to_world: Transform,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Option<Box<dyn Shape>> {
    let shape: Result<Box<dyn Shape>, ConfigError> = match name {
        "spherede" => create_sphere_shape(object_to_world, reverse_orientation, params)
            .map(|s| Box::new(s) as Box<dyn Shape>),
        "infinitespheregridde" => {
            create_sphere_grid_shape(object_to_world, reverse_orientation, params)
                .map(|s| Box::new(s) as Box<dyn Shape>)
        }
        "torusde" => create_torus_shape(object_to_world, reverse_orientation, params)
            .map(|s| Box::new(s) as Box<dyn Shape>),
        "mandelbulbde" => create_mandelbulb_shape(object_to_world, reverse_orientation, params)
            .map(|s| Box::new(s) as Box<dyn Shape>),
        _ => {
            log::error!("Shape \"{}\" unknown.", name);
            return None;
        }
    };

    params.report_unused();
    match shape {
        Ok(shape) => {
            log::debug!("Created shape \"{}\"", name);
            Some(shape)
        }
        Err(e) => {
            log::error!("Unable to create shape \"{}\": {}", name, e);
            None
        }
    }
}

/// Build a lightfield camera. Out-of-range parameters are logged and replaced
/// by their defaults, and a camera grid that does not fit the film by a
/// single tile.
pub fn create_lightfield_camera(
    camera_to_world: Transform,
    full_resolution: UVec2,
    params: &ParamSet,
) -> Result<LightfieldCamera, ConfigError> {
    let mut settings = LightfieldParams::from_params(params, full_resolution);
    params.report_unused();

    let camera = match LightfieldCamera::new(camera_to_world, full_resolution, &settings) {
        Err(e @ ConfigError::CameraGrid { .. }) => {
            log::error!("{}; using a single camera", e);
            settings.cameras_per_dim = UVec2::ONE;
            LightfieldCamera::new(camera_to_world, full_resolution, &settings)
        }
        other => other,
    }?;

    log::debug!(
        "Created lightfield camera for a {}x{} film",
        camera.film_resolution().x,
        camera.film_resolution().y
    );
    Ok(camera)
}
